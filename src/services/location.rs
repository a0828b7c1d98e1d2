//! Location routing policy: which scan targets each role may set.
//!
//! A single role→menu table drives both the server-side authorization check
//! in `resolve_target` and the option list served to scanning clients, so
//! the two cannot drift apart. The engine never restricts which location may
//! follow which — only who may request a given target.

use crate::error::AppError;
use crate::models::document::Notary;
use crate::models::user::Role;

/// Conventional resting place for finished copies. Not a terminal state;
/// nothing stops a document from moving out of the archive again.
pub const ARCHIVE: &str = "ARCHIVE";

/// Fixed target for the front counter.
pub const COUNTER: &str = "COUNTER";

/// Menu entries offered to roles that pick their scan target explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Matrix,
    Procedure,
    FirstFiling,
    Copy,
    Registry,
    SecondFiling,
    Archive,
    Invoice,
    /// Resolves to the signing desk of the document's notary.
    Signature,
}

impl MenuOption {
    /// Stable wire code, as sent by clients in `target_place`.
    pub fn code(self) -> &'static str {
        match self {
            MenuOption::Matrix => "MATRIX",
            MenuOption::Procedure => "PROCEDURE",
            MenuOption::FirstFiling => "FIRST_FILING",
            MenuOption::Copy => "COPY",
            MenuOption::Registry => "REGISTRY",
            MenuOption::SecondFiling => "SECOND_FILING",
            MenuOption::Archive => ARCHIVE,
            MenuOption::Invoice => "INVOICE",
            MenuOption::Signature => "SIGNATURE",
        }
    }

    /// The location actually written to the movement history. Only the
    /// signature option depends on the document: it points at the notary's
    /// own desk when the notary is known.
    pub fn resolve(self, document_notary: Option<Notary>) -> String {
        match (self, document_notary) {
            (MenuOption::Signature, Some(notary)) => format!("SIGNATURE_{}", notary.as_str()),
            _ => self.code().to_string(),
        }
    }
}

/// The role→menu table. Roles absent here scan implicitly: counter to
/// COUNTER, everyone else to their assigned desk.
pub fn menu_for(role: Role) -> &'static [MenuOption] {
    use MenuOption::*;
    match role {
        Role::Officer => &[Matrix, Procedure],
        Role::CopyClerk => &[FirstFiling, Copy, Registry, SecondFiling, Archive, Signature],
        Role::Accounting => &[Invoice, Archive, Signature],
        _ => &[],
    }
}

/// Decides the location a scan should record.
///
/// Menu roles must name one of their menu options; leaving the choice out is
/// a caller error, and naming an option outside the menu is forbidden. An
/// explicit valid selection always wins over the implicit default. Roles
/// without a menu fall back to COUNTER (counter role) or their assigned desk.
pub fn resolve_target(
    role: Role,
    selected: Option<&str>,
    assigned_desk: &str,
    document_notary: Option<Notary>,
) -> Result<String, AppError> {
    let menu = menu_for(role);

    match selected {
        Some(code) => {
            let option = menu
                .iter()
                .find(|option| option.code() == code)
                .ok_or_else(|| {
                    AppError::Forbidden(format!(
                        "Location {} is not available to the {} role",
                        code,
                        role.as_str()
                    ))
                })?;
            Ok(option.resolve(document_notary))
        }
        None if !menu.is_empty() => Err(AppError::Validation(
            "A location selection is required for this role".to_string(),
        )),
        None if role == Role::Counter => Ok(COUNTER.to_string()),
        None => Ok(assigned_desk.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_role_without_selection_is_a_caller_error() {
        for role in [Role::Officer, Role::CopyClerk, Role::Accounting] {
            let err = resolve_target(role, None, "D1", Some(Notary::A)).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?}", role);
        }
    }

    #[test]
    fn counter_always_resolves_to_counter() {
        assert_eq!(
            resolve_target(Role::Counter, None, "D7", None).unwrap(),
            "COUNTER"
        );
        assert_eq!(
            resolve_target(Role::Counter, None, "", Some(Notary::B)).unwrap(),
            "COUNTER"
        );
    }

    #[test]
    fn implicit_roles_land_on_their_desk() {
        assert_eq!(
            resolve_target(Role::Notary, None, "SIGNATURE_A", None).unwrap(),
            "SIGNATURE_A"
        );
        assert_eq!(resolve_target(Role::Admin, None, "D9", None).unwrap(), "D9");
    }

    #[test]
    fn explicit_selection_overrides_the_desk() {
        let place = resolve_target(Role::Officer, Some("MATRIX"), "D1", None).unwrap();
        assert_eq!(place, "MATRIX");
    }

    #[test]
    fn selection_outside_the_menu_is_forbidden() {
        let err = resolve_target(Role::Officer, Some("INVOICE"), "D1", None).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // Roles without a menu cannot select anything explicitly.
        let err = resolve_target(Role::Notary, Some("ARCHIVE"), "D2", None).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn signature_resolves_against_the_document_notary() {
        let place =
            resolve_target(Role::CopyClerk, Some("SIGNATURE"), "D3", Some(Notary::B)).unwrap();
        assert_eq!(place, "SIGNATURE_B");

        // Without a known notary the generic placeholder is used.
        let place = resolve_target(Role::Accounting, Some("SIGNATURE"), "D4", None).unwrap();
        assert_eq!(place, "SIGNATURE");
    }

    #[test]
    fn copy_clerk_menu_includes_every_stage() {
        let codes: Vec<&str> = menu_for(Role::CopyClerk).iter().map(|o| o.code()).collect();
        assert_eq!(
            codes,
            ["FIRST_FILING", "COPY", "REGISTRY", "SECOND_FILING", "ARCHIVE", "SIGNATURE"]
        );
    }
}
