/// Login state for the interactive session.
///
/// At most one account is logged in at a time; the variants make the mutual
/// exclusion between a patient login and a caregiver login structural
/// instead of relying on two nullable fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Patient(String),
    Caregiver(String),
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    /// Username of the logged-in patient, if the session is a patient one.
    pub fn patient(&self) -> Option<&str> {
        match self {
            Session::Patient(username) => Some(username),
            _ => None,
        }
    }

    /// Username of the logged-in caregiver, if the session is a caregiver one.
    pub fn caregiver(&self) -> Option<&str> {
        match self {
            Session::Caregiver(username) => Some(username),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_anonymous() {
        let session = Session::default();
        assert_eq!(session, Session::Anonymous);
        assert!(!session.is_logged_in());
        assert!(session.patient().is_none());
        assert!(session.caregiver().is_none());
    }

    #[test]
    fn patient_session_exposes_only_patient_username() {
        let session = Session::Patient("bob".to_string());
        assert!(session.is_logged_in());
        assert_eq!(session.patient(), Some("bob"));
        assert!(session.caregiver().is_none());
    }

    #[test]
    fn caregiver_session_exposes_only_caregiver_username() {
        let session = Session::Caregiver("alice".to_string());
        assert!(session.is_logged_in());
        assert_eq!(session.caregiver(), Some("alice"));
        assert!(session.patient().is_none());
    }
}
