//! Session personas: the system instruction and the label the assistant
//! speaks under.

pub const USER_LABEL: &str = "You";

const ROAST_INSTRUCTION: &str = "You are a sarcastic roast master who specializes in roasting developers. \
    Be witty, funny, mean, and savage, but never offensive. \
    Your job is to roast any tech-related confession the user gives you.";

const PRAISE_INSTRUCTION: &str = "You are an enthusiastic cheerleader who specializes in praising developers. \
    Be uplifting, funny, and encouraging. \
    Your job is to praise any tech-related confession the user gives you.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Persona {
    Roast,
    Praise,
    /// Plain assistant; the system prompt comes from configuration.
    #[default]
    Chat,
}

impl Persona {
    /// Fixed instruction for this persona. `None` means "use the configured prompt".
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Persona::Roast => Some(ROAST_INSTRUCTION),
            Persona::Praise => Some(PRAISE_INSTRUCTION),
            Persona::Chat => None,
        }
    }

    pub fn assistant_label(self) -> &'static str {
        match self {
            Persona::Roast => "Roast Master",
            Persona::Praise => "Cheerleader",
            Persona::Chat => "Assistant",
        }
    }
}
