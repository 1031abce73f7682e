use crate::error::RequestResult;
use crate::gateway::{RequestGateway, send};
use sensorwatch_shared::protocol::{
    LogoutRequest, RefreshRequest, ResendVerificationRequest, VerifyEmailRequest,
};
use sensorwatch_shared::{AuthResponse, LoginCredentials, MessageResponse, RegisterCredentials};
use tokio_util::sync::CancellationToken;

/// 认证相关接口
pub struct AuthApi<'a, G: RequestGateway> {
    gateway: &'a G,
}

impl<'a, G: RequestGateway> AuthApi<'a, G> {
    pub(super) fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// 登录（不携带凭据）
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        cancel: &CancellationToken,
    ) -> RequestResult<AuthResponse> {
        Ok(send(self.gateway, credentials, cancel).await?.data)
    }

    /// 注册，待邮箱验证时响应中没有 token
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
        cancel: &CancellationToken,
    ) -> RequestResult<AuthResponse> {
        Ok(send(self.gateway, credentials, cancel).await?.data)
    }

    pub async fn logout(&self, cancel: &CancellationToken) -> RequestResult<()> {
        send(self.gateway, &LogoutRequest::default(), cancel).await?;
        Ok(())
    }

    /// 换取新的凭据
    pub async fn refresh(&self, cancel: &CancellationToken) -> RequestResult<AuthResponse> {
        Ok(send(self.gateway, &RefreshRequest::default(), cancel).await?.data)
    }

    /// 重新发送验证邮件
    pub async fn send_email_verification(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<MessageResponse> {
        let req = ResendVerificationRequest {
            email: email.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }

    pub async fn verify_email(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> RequestResult<MessageResponse> {
        let req = VerifyEmailRequest {
            token: token.to_string(),
        };
        Ok(send(self.gateway, &req, cancel).await?.data)
    }
}
