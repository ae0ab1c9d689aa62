// src/services/ticket_service.rs

use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{new_id, ProjectRepository, TicketRepository},
    models::{
        attachment::{Attachment, AttachmentPayload},
        auth::Principal,
        tickets::{CreateTicketPayload, Message, ReplyPayload, Ticket, TicketStatus},
    },
};

fn to_attachments(payloads: Vec<AttachmentPayload>) -> Result<Vec<Attachment>, AppError> {
    let now = Utc::now();
    payloads
        .into_iter()
        .map(|a| -> Result<Attachment, AppError> {
            a.validate()?;
            Ok(a.into_attachment(now))
        })
        .collect()
}

#[derive(Clone)]
pub struct TicketService {
    repo: TicketRepository,
    project_repo: ProjectRepository,
}

impl TicketService {
    pub fn new(repo: TicketRepository, project_repo: ProjectRepository) -> Self {
        Self { repo, project_repo }
    }

    // =========================================================================
    //  1. FILA DO SUPORTE (equipe)
    // =========================================================================

    /// Busca por assunto, cliente, empresa ou número do chamado
    pub async fn search(&self, query: Option<&str>) -> Vec<Ticket> {
        let tickets = self.repo.list().await;
        let Some(q) = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) else {
            return tickets;
        };

        tickets
            .into_iter()
            .filter(|t| {
                t.subject.to_lowercase().contains(&q)
                    || t.client_name.to_lowercase().contains(&q)
                    || t.client_company.as_deref().is_some_and(|c| c.to_lowercase().contains(&q))
                    || t.id.to_lowercase().contains(&q)
            })
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Ticket, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .ok_or_else(|| AppError::TicketNotFound(id.to_string()))
    }

    pub async fn set_status(&self, id: &str, status: TicketStatus) -> Result<Ticket, AppError> {
        let ticket = self
            .repo
            .update(id, |t| {
                t.status = status;
                t.updated_at = Utc::now();
                Ok(t.clone())
            })
            .await?;

        tracing::info!("🎫 Chamado {} agora {:?}", id, status);
        Ok(ticket)
    }

    pub async fn reply_as_staff(
        &self,
        actor: &Principal,
        id: &str,
        payload: ReplyPayload,
    ) -> Result<Ticket, AppError> {
        self.append_message(actor, id, payload, true).await
    }

    // =========================================================================
    //  2. PORTAL (cliente)
    // =========================================================================

    pub async fn list_for_client(&self, client: &Principal) -> Vec<Ticket> {
        self.repo.list_by_client(&client.id).await
    }

    pub async fn create_for_client(
        &self,
        client: &Principal,
        payload: CreateTicketPayload,
    ) -> Result<Ticket, AppError> {
        payload.validate()?;

        // O projeto (opcional) precisa ser do próprio cliente
        let project_id = payload.project_id.filter(|p| !p.trim().is_empty());
        if let Some(pid) = &project_id {
            let owned = self
                .project_repo
                .find_by_id(pid)
                .await
                .is_some_and(|p| p.client_id == client.id);
            if !owned {
                return Err(AppError::ProjectNotFound(pid.clone()));
            }
        }

        let attachments = to_attachments(payload.attachments)?;
        let now = Utc::now();
        let description = payload.description.trim().to_string();

        let ticket = self
            .repo
            .create(|id| Ticket {
                id,
                client_id: client.id.clone(),
                client_name: client.name.clone(),
                client_company: client.company.clone(),
                project_id,
                subject: payload.subject.trim().to_string(),
                description: description.clone(),
                status: TicketStatus::Open,
                priority: payload.priority,
                category: payload.category,
                created_at: now,
                updated_at: now,
                // A descrição vira a primeira mensagem da conversa
                messages: vec![Message {
                    id: new_id("m"),
                    sender_id: client.id.clone(),
                    sender_name: client.name.clone(),
                    text: description,
                    timestamp: now,
                    is_admin: false,
                    attachments,
                }],
            })
            .await;

        tracing::info!("🎫 Chamado {} aberto por {}", ticket.id, client.email);
        Ok(ticket)
    }

    pub async fn reply_as_client(
        &self,
        client: &Principal,
        id: &str,
        payload: ReplyPayload,
    ) -> Result<Ticket, AppError> {
        // Chamado de outro cliente: responde como inexistente
        let ticket = self.get(id).await?;
        if ticket.client_id != client.id {
            return Err(AppError::TicketNotFound(id.to_string()));
        }
        self.append_message(client, id, payload, false).await
    }

    async fn append_message(
        &self,
        sender: &Principal,
        id: &str,
        payload: ReplyPayload,
        is_admin: bool,
    ) -> Result<Ticket, AppError> {
        let text = payload.text.trim().to_string();
        if text.is_empty() && payload.attachments.is_empty() {
            return Err(AppError::EmptyMessage);
        }
        let attachments = to_attachments(payload.attachments)?;

        let ticket = self
            .repo
            .update(id, |t| {
                let now = Utc::now();
                t.messages.push(Message {
                    id: new_id("m"),
                    sender_id: sender.id.clone(),
                    sender_name: sender.name.clone(),
                    text,
                    timestamp: now,
                    is_admin,
                    attachments,
                });
                t.updated_at = now;
                Ok(t.clone())
            })
            .await?;

        tracing::info!("💬 Nova mensagem no chamado {} ({})", id, sender.email);
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        db::{new_store, seed::seed_workspace, CrmRepository},
        models::tickets::TicketPriority,
    };

    async fn setup() -> (TicketService, Principal, Principal) {
        let ws = seed_workspace(4).unwrap();
        let sarah_staff = Principal::from(&ws.users[1]);
        let store = new_store(ws);
        let client = CrmRepository::new(store.clone())
            .find_by_id("c-1")
            .await
            .map(|c| Principal::from(&c))
            .unwrap();
        let svc = TicketService::new(TicketRepository::new(store.clone()), ProjectRepository::new(store));
        (svc, sarah_staff, client)
    }

    fn reply(text: &str) -> ReplyPayload {
        ReplyPayload { text: text.to_string(), attachments: vec![] }
    }

    fn new_ticket(project_id: Option<&str>) -> CreateTicketPayload {
        CreateTicketPayload {
            subject: "VPN down".to_string(),
            description: "Tunnel drops every hour.".to_string(),
            category: "Technical".to_string(),
            priority: TicketPriority::Urgent,
            project_id: project_id.map(str::to_string),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn search_matches_subject_client_company_and_id() {
        let (svc, _, _) = setup().await;
        assert_eq!(svc.search(Some("billing")).await.len(), 1);
        assert_eq!(svc.search(Some("acme")).await.len(), 1);
        assert_eq!(svc.search(Some("tkt-1001")).await.len(), 1);
        assert_eq!(svc.search(Some("jenkins")).await.len(), 1);
        assert!(svc.search(Some("globaltech")).await.is_empty());
        assert_eq!(svc.search(None).await.len(), 1);
    }

    #[tokio::test]
    async fn replies_append_in_order_and_flag_staff() {
        let (svc, staff, client) = setup().await;
        svc.reply_as_staff(&staff, "TKT-1001", reply("Looking into it")).await.unwrap();
        let t = svc.reply_as_client(&client, "TKT-1001", reply("Thanks")).await.unwrap();

        assert_eq!(t.messages.len(), 3);
        assert_eq!(t.messages[1].text, "Looking into it");
        assert!(t.messages[1].is_admin);
        assert_eq!(t.messages[2].sender_id, "c-1");
        assert!(!t.messages[2].is_admin);
    }

    #[tokio::test]
    async fn empty_reply_is_rejected() {
        let (svc, staff, _) = setup().await;
        let err = svc.reply_as_staff(&staff, "TKT-1001", reply("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyMessage));

        let with_file = ReplyPayload {
            text: String::new(),
            attachments: vec![AttachmentPayload {
                name: "log.txt".to_string(),
                url: "https://files.securelogx.com/log.txt".to_string(),
                content_type: "text/plain".to_string(),
                size: Some(120),
            }],
        };
        let t = svc.reply_as_staff(&staff, "TKT-1001", with_file).await.unwrap();
        assert_eq!(t.messages.last().unwrap().attachments.len(), 1);
    }

    #[tokio::test]
    async fn status_change_touches_updated_at() {
        let (svc, _, _) = setup().await;
        let before = svc.get("TKT-1001").await.unwrap().updated_at;
        let t = svc.set_status("TKT-1001", TicketStatus::Resolved).await.unwrap();
        assert_eq!(t.status, TicketStatus::Resolved);
        assert!(t.updated_at > before);
    }

    #[tokio::test]
    async fn client_ticket_gets_next_number_and_first_message() {
        let (svc, _, client) = setup().await;
        let t = svc.create_for_client(&client, new_ticket(None)).await.unwrap();
        assert_eq!(t.id, "TKT-1002");
        assert_eq!(t.status, TicketStatus::Open);
        assert_eq!(t.messages.len(), 1);
        assert_eq!(t.messages[0].text, "Tunnel drops every hour.");
        assert_eq!(t.client_company.as_deref(), Some("Acme Inc."));
        // Novos chamados aparecem primeiro
        assert_eq!(svc.list_for_client(&client).await[0].id, "TKT-1002");
    }

    #[tokio::test]
    async fn client_cannot_reference_foreign_project_or_ticket() {
        let (svc, _, mut client) = setup().await;
        let err = svc.create_for_client(&client, new_ticket(Some("PRJ-9999"))).await.unwrap_err();
        assert!(matches!(err, AppError::ProjectNotFound(_)));

        client.id = "cust-2".to_string();
        let err = svc.reply_as_client(&client, "TKT-1001", reply("hi")).await.unwrap_err();
        assert!(matches!(err, AppError::TicketNotFound(_)));
    }

    fn attachment(name: &str, url: &str) -> AttachmentPayload {
        AttachmentPayload {
            name: name.to_string(),
            url: url.to_string(),
            content_type: "image/png".to_string(),
            size: None,
        }
    }

    #[tokio::test]
    async fn invalid_attachment_rejects_the_whole_message() {
        let (svc, staff, client) = setup().await;
        let bad = ReplyPayload {
            text: "Screenshot attached".to_string(),
            attachments: vec![attachment("ok.png", "https://files.securelogx.com/ok.png"), attachment("  ", "")],
        };
        let err = svc.reply_as_staff(&staff, "TKT-1001", bad).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.get("TKT-1001").await.unwrap().messages.len(), 1);

        let mut ticket = new_ticket(None);
        ticket.attachments = vec![attachment("log.txt", "   ")];
        let err = svc.create_for_client(&client, ticket).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.list_for_client(&client).await.len(), 1);

        let ok = ReplyPayload { text: String::new(), attachments: vec![attachment("ok.png", "https://files.securelogx.com/ok.png")] };
        let t = svc.reply_as_staff(&staff, "TKT-1001", ok).await.unwrap();
        assert_eq!(t.messages.last().unwrap().attachments[0].name, "ok.png");
        assert!(t.messages.last().unwrap().attachments[0].uploaded_at.is_some());
    }

    #[tokio::test]
    async fn whitespace_subject_is_rejected() {
        let (svc, _, client) = setup().await;
        let mut ticket = new_ticket(None);
        ticket.subject = "    ".to_string();
        let err = svc.create_for_client(&client, ticket).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
