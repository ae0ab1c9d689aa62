// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("validation_failed", "One or more fields are invalid."),
    ("email_already_exists", "A user with this email already exists."),
    ("invalid_credentials", "Invalid credentials or unauthorized access."),
    ("account_pending_approval", "Identity profile is currently pending administrative authorization."),
    ("invalid_token", "Authentication token is invalid or missing."),
    ("user_not_found", "User not found."),
    ("customer_not_found", "Client not found."),
    ("project_not_found", "Project not found."),
    ("task_not_found", "Task not found."),
    ("ticket_not_found", "Ticket not found."),
    ("service_not_found", "Service not found."),
    ("forbidden", "Your current authorization level does not permit this action."),
    ("root_admin_protected", "Root administrator cannot be deleted."),
    ("invalid_amount", "Amount must be greater than zero."),
    ("amount_out_of_range", "Amount exceeds the supported range."),
    ("empty_message", "A reply needs text or at least one attachment."),
    ("internal_error", "An unexpected error occurred."),
];

const AR: &[(&str, &str)] = &[
    ("validation_failed", "حقل واحد أو أكثر غير صالح."),
    ("email_already_exists", "يوجد مستخدم بهذا البريد الإلكتروني بالفعل."),
    ("invalid_credentials", "بيانات الدخول غير صحيحة أو الوصول غير مصرح به."),
    ("account_pending_approval", "الحساب بانتظار موافقة الإدارة."),
    ("invalid_token", "رمز المصادقة غير صالح أو مفقود."),
    ("user_not_found", "المستخدم غير موجود."),
    ("customer_not_found", "العميل غير موجود."),
    ("project_not_found", "المشروع غير موجود."),
    ("task_not_found", "المهمة غير موجودة."),
    ("ticket_not_found", "التذكرة غير موجودة."),
    ("service_not_found", "الخدمة غير موجودة."),
    ("forbidden", "مستوى صلاحياتك الحالي لا يسمح بهذا الإجراء."),
    ("root_admin_protected", "لا يمكن حذف المسؤول الرئيسي."),
    ("invalid_amount", "يجب أن يكون المبلغ أكبر من صفر."),
    ("amount_out_of_range", "المبلغ يتجاوز الحد المسموح به."),
    ("empty_message", "يجب أن يحتوي الرد على نص أو مرفق واحد على الأقل."),
    ("internal_error", "حدث خطأ غير متوقع."),
];

/// Tabelas de mensagens por idioma
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("en", EN.iter().copied().collect());
        messages.insert("ar", AR.iter().copied().collect());
        Self { messages }
    }

    /// Idioma pedido -> inglês -> a própria chave
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("ar", "user_not_found"), "المستخدم غير موجود.");
        assert_eq!(store.translate("fr", "user_not_found"), "User not found.");
        assert_eq!(store.translate("en", "no_such_key"), "no_such_key");
    }

    #[test]
    fn every_english_key_has_an_arabic_entry() {
        let ar: Vec<&str> = AR.iter().map(|(k, _)| *k).collect();
        for (key, _) in EN {
            assert!(ar.contains(key), "missing ar translation for {key}");
        }
    }
}
