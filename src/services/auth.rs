// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{new_id, CrmRepository, UserRepository},
    models::{
        auth::{
            AccountStatus, AuthResponse, Claims, LoginMode, LoginUserPayload, Principal,
            RegisterClientPayload, RegistrationResponse, UpdateProfilePayload, UserRole,
        },
        crm::{Customer, CustomerStatus},
    },
    services::{audit_service::AuditService, rbac_service::landing_view},
};

// Executa o hashing em um thread separado (bcrypt é CPU-bound)
pub async fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    let password_clone = plain.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(plain: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = plain.to_owned();
    let hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    crm_repo: CrmRepository,
    audit: AuditService,
    jwt_secret: String,
    jwt_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        crm_repo: CrmRepository,
        audit: AuditService,
        jwt_secret: String,
        jwt_ttl_hours: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self { user_repo, crm_repo, audit, jwt_secret, jwt_ttl_hours, bcrypt_cost }
    }

    pub async fn login(&self, payload: &LoginUserPayload) -> Result<AuthResponse, AppError> {
        let principal = match payload.mode {
            LoginMode::Staff => self.login_staff(&payload.email, &payload.password).await?,
            LoginMode::Client => self.login_client(&payload.email, &payload.password).await?,
        };

        let token = self.create_token(&principal.id, principal.role)?;
        tracing::info!("🔑 Login de {} ({:?})", principal.email, principal.role);

        Ok(AuthResponse {
            token,
            landing_view: landing_view(&principal),
            user: principal,
        })
    }

    async fn login_staff(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await
            .ok_or(AppError::InvalidCredentials)?;

        // Colaborador provisionado sem senha ainda não consegue entrar
        let password_hash = user.password_hash.as_deref().ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        match user.status {
            AccountStatus::Approved => Ok(Principal::from(&user)),
            AccountStatus::Pending => Err(AppError::AccountPendingApproval),
            AccountStatus::Rejected => Err(AppError::InvalidCredentials),
        }
    }

    async fn login_client(&self, email: &str, password: &str) -> Result<Principal, AppError> {
        let customer = self
            .crm_repo
            .find_by_email(email)
            .await
            .ok_or(AppError::InvalidCredentials)?;

        let password_hash = customer.password_hash.as_deref().ok_or(AppError::InvalidCredentials)?;
        if !verify_password(password, password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        match customer.account_status {
            AccountStatus::Approved => Ok(Principal::from(&customer)),
            AccountStatus::Pending => Err(AppError::AccountPendingApproval),
            AccountStatus::Rejected => Err(AppError::InvalidCredentials),
        }
    }

    /// Auto-cadastro do cliente: entra como Lead, aguardando aprovação
    pub async fn register_client(
        &self,
        payload: &RegisterClientPayload,
    ) -> Result<RegistrationResponse, AppError> {
        let email = payload.email.trim().to_lowercase();
        if self.crm_repo.email_taken(&email, None).await {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = hash_password(&payload.password, self.bcrypt_cost).await?;
        let assigned_to = self.user_repo.first_staff_id().await.unwrap_or_default();

        let customer = self
            .crm_repo
            .create(Customer {
                id: new_id("cust"),
                name: payload.name.trim().to_string(),
                company: payload.company.trim().to_string(),
                email,
                phone: String::new(),
                status: CustomerStatus::Lead,
                account_status: AccountStatus::Pending,
                lifetime_value: Default::default(),
                total_price: Default::default(),
                paid_amount: Default::default(),
                last_contact: Utc::now().date_naive(),
                assigned_to,
                password_hash: Some(hashed_password),
                description: None,
                industry: None,
            })
            .await?;

        tracing::info!("🆕 Cliente {} cadastrado, aguardando aprovação", customer.email);

        Ok(RegistrationResponse {
            customer_id: customer.id,
            account_status: customer.account_status,
        })
    }

    /// Valida o token e recarrega o usuário: mudanças de permissão valem na hora
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        let principal = match claims.role {
            UserRole::Client => self
                .crm_repo
                .find_by_id(&claims.sub)
                .await
                .map(|c| Principal::from(&c)),
            UserRole::Admin | UserRole::Staff => self
                .user_repo
                .find_by_id(&claims.sub)
                .await
                .map(|u| Principal::from(&u)),
        }
        .ok_or(AppError::InvalidToken)?;

        // Conta rebaixada / removida depois da emissão do token
        if principal.status != AccountStatus::Approved {
            return Err(AppError::InvalidToken);
        }

        Ok(principal)
    }

    pub fn create_token(&self, subject: &str, role: UserRole) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt_ttl_hours);

        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Atualiza o próprio perfil. Para clientes só o nome é aplicado.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        payload: UpdateProfilePayload,
    ) -> Result<Principal, AppError> {
        let new_hash = match (&payload.password, principal.is_client()) {
            (Some(pwd), false) => Some(hash_password(pwd, self.bcrypt_cost).await?),
            _ => None,
        };

        let (before, after) = if principal.is_client() {
            self.crm_repo
                .update(&principal.id, |c| {
                    let before = Principal::from(&*c);
                    if let Some(name) = &payload.name {
                        c.name = name.trim().to_string();
                    }
                    Ok((before, Principal::from(&*c)))
                })
                .await?
        } else {
            self.user_repo
                .update(&principal.id, |u| {
                    let before = Principal::from(&*u);
                    if let Some(name) = &payload.name {
                        u.name = name.trim().to_string();
                    }
                    if let Some(avatar) = payload.avatar {
                        u.avatar = Some(avatar);
                    }
                    if new_hash.is_some() {
                        u.password_hash = new_hash;
                    }
                    Ok((before, Principal::from(&*u)))
                })
                .await?
        };

        self.audit.log_action(principal, Some(&before), Some(&after)).await?;
        tracing::info!("👤 Perfil de {} atualizado", after.email);
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    use crate::{
        db::{new_store, seed::seed_workspace, AuditRepository, Store},
        models::rbac::ViewType,
    };

    fn setup() -> (AuthService, Store) {
        let store = new_store(seed_workspace(4).unwrap());
        let auth = AuthService::new(
            UserRepository::new(store.clone()),
            CrmRepository::new(store.clone()),
            AuditService::new(AuditRepository::new(store.clone())),
            "segredo-de-teste".to_string(),
            168,
            4,
        );
        (auth, store)
    }

    fn service() -> AuthService {
        setup().0
    }

    fn login(email: &str, password: &str, mode: LoginMode) -> LoginUserPayload {
        LoginUserPayload { email: email.to_string(), password: password.to_string(), mode }
    }

    #[tokio::test]
    async fn staff_login_is_case_insensitive_and_lands_on_dashboard() {
        let auth = service();
        let resp = auth
            .login(&login("ADMIN@securelogx.com", "P@ssw0rd", LoginMode::Staff))
            .await
            .unwrap();
        assert_eq!(resp.user.id, "u-admin");
        assert_eq!(resp.landing_view, ViewType::Dashboard);

        let principal = auth.validate_token(&resp.token).await.unwrap();
        assert_eq!(principal.email, "admin@securelogx.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service();
        let err = auth
            .login(&login("admin@securelogx.com", "nope", LoginMode::Staff))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn approved_client_lands_on_portal() {
        let auth = service();
        let resp = auth
            .login(&login("s.jenkins@acme.inc", "clientpassword", LoginMode::Client))
            .await
            .unwrap();
        assert_eq!(resp.user.role, UserRole::Client);
        assert_eq!(resp.landing_view, ViewType::ClientPortal);
    }

    #[tokio::test]
    async fn registration_rejects_duplicates_and_pending_cannot_login() {
        let auth = service();
        let dup = RegisterClientPayload {
            name: "Outra".to_string(),
            email: "S.Jenkins@acme.inc".to_string(),
            company: "Acme".to_string(),
            password: "secret1".to_string(),
        };
        assert!(matches!(auth.register_client(&dup).await.unwrap_err(), AppError::EmailAlreadyExists));

        let fresh = RegisterClientPayload {
            name: "Maria Saleh".to_string(),
            email: "maria@saleh.sa".to_string(),
            company: "Saleh Logistics".to_string(),
            password: "secret1".to_string(),
        };
        let reg = auth.register_client(&fresh).await.unwrap();
        assert_eq!(reg.account_status, AccountStatus::Pending);

        let err = auth
            .login(&login("maria@saleh.sa", "secret1", LoginMode::Client))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccountPendingApproval));
    }

    #[tokio::test]
    async fn client_token_is_not_a_staff_token() {
        let auth = service();
        let token = auth.create_token("c-1", UserRole::Staff).unwrap();
        assert!(matches!(auth.validate_token(&token).await.unwrap_err(), AppError::InvalidToken));
    }

    #[tokio::test]
    async fn profile_update_is_audited() {
        let auth = service();
        let me = auth.validate_token(&auth.create_token("u-2", UserRole::Staff).unwrap()).await.unwrap();
        let updated = auth
            .update_profile(&me, UpdateProfilePayload { name: Some("Sarah K.".to_string()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Sarah K.");
        assert_eq!(auth.audit.search(Some("sarah.k")).await.len(), 1);
    }

    #[tokio::test]
    async fn token_dies_with_deleted_staff() {
        let (auth, store) = setup();
        let token = auth.create_token("u-2", UserRole::Staff).unwrap();
        assert!(auth.validate_token(&token).await.is_ok());

        store.write().await.users.retain(|u| u.id != "u-2");
        assert!(matches!(auth.validate_token(&token).await.unwrap_err(), AppError::InvalidToken));
    }

    #[tokio::test]
    async fn token_dies_when_account_leaves_approved() {
        let (auth, store) = setup();
        let staff = auth.create_token("u-2", UserRole::Staff).unwrap();
        let client = auth.create_token("c-1", UserRole::Client).unwrap();

        {
            let mut ws = store.write().await;
            if let Some(u) = ws.users.iter_mut().find(|u| u.id == "u-2") {
                u.status = AccountStatus::Pending;
            }
            if let Some(c) = ws.customers.iter_mut().find(|c| c.id == "c-1") {
                c.account_status = AccountStatus::Rejected;
            }
        }

        assert!(matches!(auth.validate_token(&staff).await.unwrap_err(), AppError::InvalidToken));
        assert!(matches!(auth.validate_token(&client).await.unwrap_err(), AppError::InvalidToken));
    }

    #[test]
    fn whitespace_registration_fields_are_blank() {
        let payload = RegisterClientPayload {
            name: "   ".to_string(),
            email: "maria@saleh.sa".to_string(),
            company: "\t".to_string(),
            password: "secret1".to_string(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("company"));
    }
}
