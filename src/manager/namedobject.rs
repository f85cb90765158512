use serde::Deserialize;

/// The `name` field shared by every named JSON object (terms, rules).
#[derive(Clone, Deserialize)]
pub struct NamedJsonObject {
    name: String
}


impl NamedJsonObject {
    pub fn name(&self) -> &String {
        &self.name
    }
}
