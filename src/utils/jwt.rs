use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    config::IdentityConfig,
    error::{AppError, Result},
    models::UserRole,
};

/// Claims issued by the identity provider. Only `sub` and `exp` are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::ConfigError(
                "IDENTITY_JWT_SECRET must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "Token is missing a subject".to_string(),
            ));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config(issuer: Option<&str>, audience: Option<&str>) -> IdentityConfig {
        IdentityConfig {
            jwt_secret: SECRET.to_string(),
            issuer: issuer.map(str::to_string),
            audience: audience.map(str::to_string),
        }
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn verifies_claims_and_reads_role() {
        let verifier = TokenVerifier::new(&config(None, None)).unwrap();
        let token = sign(
            json!({ "sub": "admin-1", "email": "a@hoods.test", "role": "admin", "exp": exp() }),
            SECRET,
        );

        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin-1");
        assert!(claims.is_admin());
    }

    #[test]
    fn missing_or_unknown_role_falls_back_to_buyer() {
        let verifier = TokenVerifier::new(&config(None, None)).unwrap();

        let plain = sign(json!({ "sub": "u1", "exp": exp() }), SECRET);
        assert_eq!(verifier.verify(&plain).unwrap().role, UserRole::Buyer);

        let odd = sign(json!({ "sub": "u1", "role": "superuser", "exp": exp() }), SECRET);
        assert_eq!(verifier.verify(&odd).unwrap().role, UserRole::Buyer);
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = TokenVerifier::new(&config(None, None)).unwrap();
        let token = sign(json!({ "sub": "u1", "exp": exp() }), "other-secret");

        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let verifier = TokenVerifier::new(&config(None, None)).unwrap();
        let token = sign(json!({ "sub": "u1", "exp": 1_000 }), SECRET);

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn enforces_configured_issuer_and_audience() {
        let verifier =
            TokenVerifier::new(&config(Some("https://id.hoods.test"), Some("hoodsgoods"))).unwrap();

        let good = sign(
            json!({ "sub": "u1", "iss": "https://id.hoods.test", "aud": "hoodsgoods", "exp": exp() }),
            SECRET,
        );
        assert!(verifier.verify(&good).is_ok());

        let wrong_issuer = sign(
            json!({ "sub": "u1", "iss": "https://evil.test", "aud": "hoodsgoods", "exp": exp() }),
            SECRET,
        );
        assert!(verifier.verify(&wrong_issuer).is_err());
    }

    #[test]
    fn rejects_empty_subject() {
        let verifier = TokenVerifier::new(&config(None, None)).unwrap();
        let token = sign(json!({ "sub": " ", "exp": exp() }), SECRET);

        assert!(verifier.verify(&token).is_err());
    }
}
