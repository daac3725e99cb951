//! Registration state machine.
//!
//! Every inbound update passes through this gate before any navigation or
//! remark handling. The machine collects a phone number (via the contact
//! share button), a display name and a position, in that order, and only
//! then lets traffic through.
//!
//! The machine is pure. [`RegistrationDraft::advance`] inspects one event
//! and either returns a prompt to send ([`Advance::Blocked`]), records a
//! field and asks to be invoked again with [`RegistrationEvent::Poll`]
//! ([`Advance::Captured`]), hands the caller the completed fields to write
//! to storage ([`Advance::Persist`]), or waves the update through
//! ([`Advance::Proceed`]). The caller owns all side effects.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationStep {
    #[default]
    AwaitingContact,
    AwaitingName,
    AwaitingPosition,
    Complete,
}

/// Prompt the gate should send when an update cannot pass yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPrompt {
    RequestContact,
    AskName,
    AskPosition,
}

/// The registration-relevant slice of one inbound update.
#[derive(Debug, Clone, Copy)]
pub enum RegistrationEvent<'a> {
    /// Re-invocation after a captured field, or an update that carries no
    /// registration data (callback, photo, command).
    Poll,
    ContactShared { phone: &'a str },
    Text(&'a str),
}

/// Outcome of a single [`RegistrationDraft::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Send this prompt and stop processing the current update.
    Blocked(RegistrationPrompt),
    /// A field was captured; invoke again with [`RegistrationEvent::Poll`].
    Captured,
    /// All fields are collected. Persist them, call
    /// [`RegistrationDraft::mark_persisted`], then poll again.
    Persist {
        phone: String,
        name: String,
        position: String,
    },
    /// Registration is satisfied; the update may proceed.
    Proceed,
}

/// Per-user transient registration state.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    step: RegistrationStep,
    phone: Option<String>,
    name: Option<String>,
    position: Option<String>,
    persisted: bool,
}

impl RegistrationDraft {
    /// Rebuild a draft from a stored profile. A profile with all three
    /// fields filled yields an already-satisfied draft; anything else
    /// starts registration from scratch.
    pub fn from_profile(
        phone: Option<String>,
        name: Option<String>,
        position: Option<String>,
    ) -> Self {
        let filled = |field: &Option<String>| {
            field.as_deref().is_some_and(|v| !v.trim().is_empty())
        };
        if filled(&phone) && filled(&name) && filled(&position) {
            Self {
                step: RegistrationStep::Complete,
                phone,
                name,
                position,
                persisted: true,
            }
        } else {
            Self::default()
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn is_satisfied(&self) -> bool {
        self.step == RegistrationStep::Complete && self.persisted
    }

    /// Record that the completed fields were written to storage.
    pub fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    /// Feed one event through the machine. See the module docs for the
    /// re-invocation contract.
    pub fn advance(&mut self, event: RegistrationEvent<'_>) -> Advance {
        match self.step {
            RegistrationStep::AwaitingContact => match event {
                RegistrationEvent::ContactShared { phone } => {
                    self.phone = Some(phone.trim().to_string());
                    self.step = RegistrationStep::AwaitingName;
                    Advance::Captured
                }
                _ => Advance::Blocked(RegistrationPrompt::RequestContact),
            },
            RegistrationStep::AwaitingName => match event {
                RegistrationEvent::Text(text) if !text.trim().is_empty() => {
                    self.name = Some(text.trim().to_string());
                    self.step = RegistrationStep::AwaitingPosition;
                    Advance::Captured
                }
                _ => Advance::Blocked(RegistrationPrompt::AskName),
            },
            RegistrationStep::AwaitingPosition => match event {
                RegistrationEvent::Text(text) if !text.trim().is_empty() => {
                    self.position = Some(text.trim().to_string());
                    self.step = RegistrationStep::Complete;
                    Advance::Captured
                }
                _ => Advance::Blocked(RegistrationPrompt::AskPosition),
            },
            RegistrationStep::Complete => {
                if self.persisted {
                    return Advance::Proceed;
                }
                // The machine only reaches Complete with all fields set;
                // restart cleanly if a caller constructed a torn draft.
                match (self.phone.clone(), self.name.clone(), self.position.clone()) {
                    (Some(phone), Some(name), Some(position)) => Advance::Persist {
                        phone,
                        name,
                        position,
                    },
                    _ => {
                        self.step = RegistrationStep::AwaitingContact;
                        Advance::Blocked(RegistrationPrompt::RequestContact)
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
