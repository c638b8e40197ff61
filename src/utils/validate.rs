// ============================================================================
// VALIDATE - Клиентская валидация форм (до любого сетевого вызова)
// ============================================================================

use crate::models::PostDraft;

/// Контакт принимается в виде телеграм-ника ("@...") или телефона ("+7...", "8...")
pub fn is_valid_contact(contact: &str) -> bool {
    let trimmed = contact.trim();
    trimmed.starts_with('@') || trimmed.starts_with("+7") || trimmed.starts_with('8')
}

/// Проверка черновика объявления перед отправкой
pub fn validate_draft(draft: &PostDraft) -> Result<(), String> {
    if draft.title.trim().is_empty()
        || draft.content.trim().is_empty()
        || draft.contact.trim().is_empty()
    {
        return Err("Заполните заголовок, описание и контакты".to_string());
    }

    if !is_valid_contact(&draft.contact) {
        return Err(
            "Контакты должны начинаться с '@' для телеграм или '+7 / 8' для телефона".to_string(),
        );
    }

    Ok(())
}

/// Человекочитаемый остаток до дедлайна ("3 дн. 4 ч." / "2 ч." / "15 мин.")
/// None — дедлайн уже прошёл
pub fn remaining_label(remaining_ms: i64) -> Option<String> {
    if remaining_ms <= 0 {
        return None;
    }
    let total_minutes = remaining_ms / 60_000;
    let days = total_minutes / (60 * 24);
    let hours = (total_minutes - days * 60 * 24) / 60;
    if days > 0 {
        return Some(format!("{} дн. {} ч.", days, hours));
    }
    if hours > 0 {
        return Some(format!("{} ч.", hours));
    }
    Some(format!("{} мин.", total_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(contact: &str) -> PostDraft {
        PostDraft {
            title: "Продам велосипед".to_string(),
            content: "Почти новый".to_string(),
            contact: contact.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn contact_accepts_known_prefixes() {
        assert!(is_valid_contact("@lightnet"));
        assert!(is_valid_contact("+79001234567"));
        assert!(is_valid_contact("89001234567"));
        assert!(is_valid_contact("  @spaced  "));
    }

    #[test]
    fn contact_rejects_other_prefixes() {
        assert!(!is_valid_contact("lightnet@mail.ru"));
        assert!(!is_valid_contact("+49123"));
        assert!(!is_valid_contact(""));
    }

    #[test]
    fn draft_with_bad_contact_is_blocked() {
        assert!(validate_draft(&draft("vk.com/me")).is_err());
        assert!(validate_draft(&draft("@me")).is_ok());
    }

    #[test]
    fn draft_requires_all_mandatory_fields() {
        let mut d = draft("@me");
        d.content = "   ".to_string();
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn remaining_label_formats_by_magnitude() {
        assert_eq!(remaining_label(-5), None);
        assert_eq!(remaining_label(0), None);
        assert_eq!(remaining_label(15 * 60_000), Some("15 мин.".to_string()));
        assert_eq!(remaining_label(3 * 3_600_000), Some("3 ч.".to_string()));
        assert_eq!(
            remaining_label((2 * 24 + 5) * 3_600_000),
            Some("2 дн. 5 ч.".to_string())
        );
    }
}
