use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    fn parse(raw: Option<&str>) -> Role {
        match raw {
            Some("admin") => Role::Admin,
            Some("staff") => Role::Staff,
            _ => Role::Customer,
        }
    }
}

/// Caller identity as resolved by the upstream auth gateway. Token
/// verification happens there; this service trusts the forwarded
/// `x-user-id` / `x-user-role` headers, and the same id keys the caller's
/// cart.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "administrator access required".to_string(),
            ))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
        let result = match header("x-user-id").map(Uuid::parse_str) {
            Some(Ok(user_id)) => Ok(Identity {
                user_id,
                role: Role::parse(header("x-user-role")),
            }),
            Some(Err(_)) => Err(AppError::Unauthorized(
                "caller identity is malformed".to_string(),
            )),
            None => Err(AppError::Unauthorized("please sign in".to_string())),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn missing_identity_header_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = Identity::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn malformed_identity_header_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header(("x-user-id", "not-a-uuid"))
            .to_http_request();
        let result = Identity::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn role_defaults_to_customer() {
        let user_id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header(("x-user-id", user_id.to_string()))
            .to_http_request();
        let identity = Identity::from_request(&req, &mut Payload::None)
            .await
            .expect("identity");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Customer);
        assert!(identity.require_admin().is_err());
    }

    #[actix_web::test]
    async fn admin_role_is_recognized() {
        let req = TestRequest::default()
            .insert_header(("x-user-id", Uuid::new_v4().to_string()))
            .insert_header(("x-user-role", "admin"))
            .to_http_request();
        let identity = Identity::from_request(&req, &mut Payload::None)
            .await
            .expect("identity");
        assert!(identity.require_admin().is_ok());
    }
}
