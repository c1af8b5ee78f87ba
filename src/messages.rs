use std::collections::HashMap;

/// Message catalog for user-facing error text.
///
/// Stands in for an external localization collaborator: services resolve
/// messages by key, the catalog decides the wording. Ships with built-in
/// English defaults; unknown keys fall back to the key itself so a missing
/// entry is visible rather than silent.
pub struct Messages {
    entries: HashMap<&'static str, &'static str>,
}

impl Messages {
    pub fn new() -> Self {
        let entries = HashMap::from([
            ("user.login.error", "User with this login is not registered"),
            ("user.password.error", "Invalid password"),
            ("file.upload.error", "File is not attached or is empty"),
            (
                "file.uploaded.error",
                "File with this name already exists. Please upload another file",
            ),
            ("file.exist.error", "File with this name was not found"),
            ("list.limit.error", "Limit must not be negative"),
        ]);
        Self { entries }
    }

    pub fn resolve(&self, key: &str) -> String {
        self.entries.get(key).copied().unwrap_or(key).to_string()
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new()
    }
}
