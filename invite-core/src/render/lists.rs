//! Updates and contacts.

use chrono_tz::Tz;
use serde::Serialize;

use crate::details::{Contact, Update, non_empty};
use crate::time::{format_local, parse_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateRow {
    pub when: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRow {
    pub name: String,
    /// " (Role) · Phone"
    pub detail: String,
}

pub fn resolve_updates(updates: &[Update], tz: Tz) -> Vec<UpdateRow> {
    updates
        .iter()
        .filter_map(|u| {
            let text = non_empty(&u.text)?;
            let when = match non_empty(&u.when) {
                Some(raw) => parse_timestamp(raw, tz)
                    .map(|at| format_local(at, tz))
                    .unwrap_or_else(|| raw.to_string()),
                None => String::new(),
            };
            Some(UpdateRow {
                when,
                text: text.to_string(),
            })
        })
        .collect()
}

pub fn resolve_contacts(contacts: &[Contact]) -> Vec<ContactRow> {
    contacts
        .iter()
        .filter_map(|c| {
            let name = non_empty(&c.name)?;
            let mut detail = String::new();
            if let Some(role) = non_empty(&c.role) {
                detail.push_str(&format!(" ({role})"));
            }
            if let Some(phone) = non_empty(&c.phone) {
                detail.push_str(&format!(" · {phone}"));
            }
            Some(ContactRow {
                name: name.to_string(),
                detail,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    #[test]
    fn updates_keep_order_and_format_dates() {
        let updates = vec![
            Update {
                when: Some("2025-11-01T09:00".into()),
                text: Some("Venue confirmed".into()),
            },
            Update {
                when: None,
                text: None,
            },
            Update {
                when: Some("last week".into()),
                text: Some("Buses booked".into()),
            },
        ];
        let rows = resolve_updates(&updates, Kolkata);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].when, "Sat, Nov 01, 2025, 09:00 AM");
        assert_eq!(rows[1].when, "last week");
    }

    #[test]
    fn contact_detail_skips_missing_parts() {
        let contacts = vec![
            Contact {
                name: Some("Priya".into()),
                role: Some("Bride's sister".into()),
                phone: Some("+91 98765 43210".into()),
            },
            Contact {
                name: Some("Kabir".into()),
                role: None,
                phone: Some("+91 91234 56789".into()),
            },
            Contact::default(),
        ];
        let rows = resolve_contacts(&contacts);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].detail, " (Bride's sister) · +91 98765 43210");
        assert_eq!(rows[1].detail, " · +91 91234 56789");
    }
}
