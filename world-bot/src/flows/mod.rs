//! Conversation flows. Each flow is a [`world_core::Handler`] that owns its per-user state.

pub mod onboarding;

pub use onboarding::{Mode, OnboardingFlow, OnboardingState};
