/// One field selected beneath the active field, attributed to the concrete type
/// that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionNode {
    schema_name: String,
    member_name: Option<String>,
    declaring_type: String,
}

impl SelectionNode {
    pub fn new(
        schema_name: impl Into<String>,
        member_name: Option<String>,
        declaring_type: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            member_name,
            declaring_type: declaring_type.into(),
        }
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// The backing data-model member, when the field declares one.
    pub fn member_name(&self) -> Option<&str> {
        self.member_name.as_deref()
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    pub fn member_or_schema_name(&self) -> &str {
        self.member_name().unwrap_or(&self.schema_name)
    }
}
