#![allow(dead_code)]

//! Wizard controller — gates forward progress through the fixed step
//! sequence. Holds only the in-memory step index; persistence belongs to the
//! draft store.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::form::FormData;

/// The ordered builder steps. The terminal generate action is only reachable
/// from the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalData,
    Objective,
    JobDescription,
    Experience,
    EducationSkills,
    Summary,
    Extras,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::PersonalData,
        WizardStep::Objective,
        WizardStep::JobDescription,
        WizardStep::Experience,
        WizardStep::EducationSkills,
        WizardStep::Summary,
        WizardStep::Extras,
    ];

    pub fn first() -> Self {
        WizardStep::PersonalData
    }

    pub fn last() -> Self {
        WizardStep::Extras
    }

    /// 1-based position, matching the progress indicator.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index()).copied()
    }

    pub fn prev(self) -> Option<Self> {
        match self.index() {
            0 | 1 => None,
            i => Self::ALL.get(i - 2).copied(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::PersonalData => "Dados pessoais",
            WizardStep::Objective => "Objetivo",
            WizardStep::JobDescription => "Vaga",
            WizardStep::Experience => "Experiência",
            WizardStep::EducationSkills => "Formação e skills",
            WizardStep::Summary => "Resumo",
            WizardStep::Extras => "Extras",
        }
    }
}

/// A generate attempt rejected by validation: the offending step plus the
/// inline message for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub step: WizardStep,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct WizardController {
    current: WizardStep,
}

impl Default for WizardController {
    fn default() -> Self {
        WizardController {
            current: WizardStep::first(),
        }
    }
}

impl WizardController {
    pub fn at(step: WizardStep) -> Self {
        WizardController { current: step }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn is_last(&self) -> bool {
        self.current == WizardStep::last()
    }

    /// Whether the given step is satisfied by the form. Only three steps
    /// gate progress; the rest are optional.
    pub fn can_advance(step: WizardStep, form: &FormData) -> bool {
        match step {
            WizardStep::PersonalData => !form.personal.full_name.trim().is_empty(),
            WizardStep::Objective => !form.target_role.trim().is_empty(),
            WizardStep::Experience => form.has_filled_experience(),
            _ => true,
        }
    }

    /// Moves forward by exactly one step. No-op at the last step or when the
    /// current step is unsatisfied.
    pub fn advance(&mut self, form: &FormData) -> bool {
        if !Self::can_advance(self.current, form) {
            debug!("advance blocked: step {:?} not satisfied", self.current);
            return false;
        }
        match self.current.next() {
            Some(next) => {
                self.current = next;
                true
            }
            None => false,
        }
    }

    /// Moves back by exactly one step. No-op at the first step.
    pub fn retreat(&mut self) -> bool {
        match self.current.prev() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    /// Jumps via the progress indicator. Only steps at or before the current
    /// one are valid targets; jumping ahead of validated progress is
    /// silently ignored and logged.
    pub fn jump_to(&mut self, step: WizardStep) -> bool {
        if step > self.current {
            debug!("ignoring jump ahead of validated progress: {:?}", step);
            return false;
        }
        self.current = step;
        true
    }

    /// Forced jump used when generate-validation sends the user back to the
    /// offending step, which may be ahead of the current one.
    pub fn force_jump(&mut self, step: WizardStep) {
        self.current = step;
    }

    /// The minimum the terminal generate action requires, independent of the
    /// current step: a target role and at least one filled experience.
    pub fn validate_for_generate(form: &FormData) -> Result<(), ValidationFailure> {
        if form.target_role.trim().is_empty() {
            return Err(ValidationFailure {
                step: WizardStep::Objective,
                message: "O cargo alvo é obrigatório para gerar seu CV.".to_string(),
            });
        }
        if !form.has_filled_experience() {
            return Err(ValidationFailure {
                step: WizardStep::Experience,
                message: "Adicione pelo menos uma experiência profissional.".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> FormData {
        let mut form = FormData::default();
        form.personal.full_name = "Ana Souza".to_string();
        form.target_role = "Engenheira de Software".to_string();
        let id = form.experiences[0].id;
        form.update_experience(id, |e| {
            e.company = "Acme".to_string();
            e.role = "Engineer".to_string();
        });
        form
    }

    #[test]
    fn test_step_indices_are_one_based_and_contiguous() {
        for (i, step) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i + 1);
        }
    }

    #[test]
    fn test_advance_moves_one_step_never_skips() {
        let form = filled_form();
        let mut wizard = WizardController::default();
        assert!(wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::Objective);
        assert!(wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::JobDescription);
    }

    #[test]
    fn test_advance_blocked_without_full_name() {
        let mut form = filled_form();
        form.personal.full_name = "  ".to_string();
        let mut wizard = WizardController::default();
        assert!(!wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::PersonalData);
    }

    #[test]
    fn test_advance_blocked_without_target_role() {
        let mut form = filled_form();
        form.target_role.clear();
        let mut wizard = WizardController::at(WizardStep::Objective);
        assert!(!wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::Objective);
    }

    #[test]
    fn test_experience_step_requires_one_filled_entry() {
        let mut form = filled_form();
        let id = form.experiences[0].id;
        form.update_experience(id, |e| e.role.clear());
        let mut wizard = WizardController::at(WizardStep::Experience);
        assert!(!wizard.advance(&form));

        form.update_experience(id, |e| e.role = "Engineer".to_string());
        assert!(wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::EducationSkills);
    }

    #[test]
    fn test_retreat_stops_at_first_step() {
        let mut wizard = WizardController::at(WizardStep::Objective);
        assert!(wizard.retreat());
        assert!(!wizard.retreat());
        assert_eq!(wizard.current(), WizardStep::PersonalData);
    }

    #[test]
    fn test_advance_stops_at_last_step() {
        let form = filled_form();
        let mut wizard = WizardController::at(WizardStep::Extras);
        assert!(!wizard.advance(&form));
        assert_eq!(wizard.current(), WizardStep::Extras);
    }

    #[test]
    fn test_jump_ahead_is_silently_ignored() {
        let mut wizard = WizardController::at(WizardStep::JobDescription);
        assert!(!wizard.jump_to(WizardStep::Summary));
        assert_eq!(wizard.current(), WizardStep::JobDescription);
    }

    #[test]
    fn test_jump_back_is_allowed() {
        let mut wizard = WizardController::at(WizardStep::Experience);
        assert!(wizard.jump_to(WizardStep::Objective));
        assert_eq!(wizard.current(), WizardStep::Objective);
    }

    #[test]
    fn test_step_stays_in_bounds_under_random_walk() {
        let form = filled_form();
        let mut wizard = WizardController::default();
        // A deterministic mixed walk; the index must always stay in [1, 7].
        for i in 0..100 {
            if i % 3 == 0 {
                wizard.retreat();
            } else {
                wizard.advance(&form);
            }
            let idx = wizard.current().index();
            assert!((1..=WizardStep::ALL.len()).contains(&idx));
        }
    }

    #[test]
    fn test_validate_for_generate_points_at_objective_first() {
        let mut form = filled_form();
        form.target_role = "   ".to_string();
        let failure = WizardController::validate_for_generate(&form).unwrap_err();
        assert_eq!(failure.step, WizardStep::Objective);
    }

    #[test]
    fn test_validate_for_generate_points_at_experience() {
        let mut form = filled_form();
        form.experiences.clear();
        let failure = WizardController::validate_for_generate(&form).unwrap_err();
        assert_eq!(failure.step, WizardStep::Experience);
    }

    #[test]
    fn test_validate_for_generate_passes_on_filled_form() {
        assert!(WizardController::validate_for_generate(&filled_form()).is_ok());
    }
}
