//! Instruction template for the yes/no relevance question.

/// Builds the single-turn prompt sent for each title.
///
/// The model is told to answer only "yes" or "no" and to prefer "yes" when
/// unsure: a missed impersonation video costs more than a false alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    topic: String,
    organization: String,
}

impl PromptTemplate {
    pub fn new(topic: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            organization: organization.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Instruction text without the title.
    pub fn instruction(&self) -> String {
        format!(
            "INSTRUCTION: I will give you a social media video title. You must answer the question: \
             Is the video related to {topic}, founder of {org} & not about some other {topic} or some totally unrelated topic?\n\
             The titles could be in non-English languages as well. Your answer must be either yes or no. \
             Do not add anything else. When in doubt, err on the side of answering yes.\n\
             Title: ",
            topic = self.topic,
            org = self.organization,
        )
    }

    /// Full prompt for one title.
    pub fn render(&self, title: &str) -> String {
        let mut prompt = self.instruction();
        prompt.push_str(title);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_topic_org_and_title() {
        let template = PromptTemplate::new("Jane Doe", "Acme");
        let prompt = template.render("Jane Doe announces free money");

        assert!(prompt.starts_with("INSTRUCTION: I will give you a social media video title."));
        assert!(prompt.contains("Is the video related to Jane Doe, founder of Acme & not about some other Jane Doe"));
        assert!(prompt.contains("err on the side of answering yes"));
        assert!(prompt.ends_with("\nTitle: Jane Doe announces free money"));
    }
}
