use std::time::{Duration, Instant};

/// How long the acknowledgment stays visible after a submission.
pub const ACK_DURATION: Duration = Duration::from_secs(3);

pub const ACK_NOTICE: &str = "Message sent! We'll get back to you soon.";

/// Which input of the contact form has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactField {
    #[default]
    Name,
    Email,
    Message,
}

impl ContactField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Message,
            Self::Message => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Message => Self::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }

    pub const ALL: [ContactField; 3] = [Self::Name, Self::Email, Self::Message];
}

/// Local-only contact form. Nothing typed here leaves the process.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub focus: ContactField,
    ack_until: Option<Instant>,
}

impl ContactForm {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.focused_mut().pop();
    }

    /// Acknowledge a submission: clear every field now, show the notice
    /// until `now + ACK_DURATION`. A resubmission restarts the window.
    pub fn submit(&mut self, now: Instant) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.focus = ContactField::Name;
        self.ack_until = Some(now + ACK_DURATION);
    }

    pub fn ack_visible(&self) -> bool {
        self.ack_until.is_some()
    }

    /// Hide the notice once its deadline passed. Returns true when it was
    /// hidden by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.ack_until {
            Some(deadline) if now >= deadline => {
                self.ack_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::default();
        for c in "Ana".chars() {
            form.push(c);
        }
        form.focus = form.focus.next();
        for c in "ana@example.com".chars() {
            form.push(c);
        }
        form.focus = form.focus.next();
        for c in "Hi!".chars() {
            form.push(c);
        }
        form
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = filled();
        assert_eq!(form.value(ContactField::Name), "Ana");
        assert_eq!(form.value(ContactField::Email), "ana@example.com");
        assert_eq!(form.value(ContactField::Message), "Hi!");
        form.pop();
        assert_eq!(form.message, "Hi");
    }

    #[test]
    fn test_submit_clears_immediately_and_hides_after_three_seconds() {
        let mut form = filled();
        let start = Instant::now();
        form.submit(start);

        assert!(form.name.is_empty());
        assert!(form.email.is_empty());
        assert!(form.message.is_empty());
        assert_eq!(form.focus, ContactField::Name);
        assert!(form.ack_visible());

        assert!(!form.tick(start + Duration::from_millis(2999)));
        assert!(form.ack_visible());

        assert!(form.tick(start + ACK_DURATION));
        assert!(!form.ack_visible());
    }

    #[test]
    fn test_resubmission_restarts_window() {
        let mut form = ContactForm::default();
        let start = Instant::now();
        form.submit(start);
        form.submit(start + Duration::from_secs(2));

        assert!(!form.tick(start + Duration::from_secs(4)));
        assert!(form.ack_visible());
        assert!(form.tick(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_focus_cycles() {
        let field = ContactField::Name;
        assert_eq!(field.next().next().next(), ContactField::Name);
        assert_eq!(field.prev(), ContactField::Message);
    }
}
