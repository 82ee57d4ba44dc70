//! Multi-step pollution report wizard.
//!
//! Three steps in strict linear order: BasicInfo, Location, Evidence.
//! `next` and `previous` move by one step and are no-ops at either end.
//! Each step can be gated on its required fields; all gates are off by
//! default. Submit is only reachable from Evidence and at most one
//! submission may be in flight. Field edits are never blocked.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::location::{LocationPicker, PickedLocation};
use crate::models::{PollutionType, Severity};
use crate::submit::{Busy, BusyToken, ReportPayload};
use crate::uploader::{ImageUploader, PreviewStore, SelectedFile};

/// Where the client goes after a report is accepted.
pub const REPORT_SUCCESS_PATH: &str = "/report/success";

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    BasicInfo,
    Location,
    Evidence,
}

impl WizardStep {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Location),
            Self::Location => Some(Self::Evidence),
            Self::Evidence => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInfo => None,
            Self::Location => Some(Self::BasicInfo),
            Self::Evidence => Some(Self::Location),
        }
    }

    /// 1-based position for the progress indicator.
    pub fn number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Location => 2,
            Self::Evidence => 3,
        }
    }
}

/// Which steps refuse to be left while their required fields are missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub basic_info: bool,
    pub location: bool,
    pub evidence: bool,
}

impl StepValidation {
    fn gates(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::BasicInfo => self.basic_info,
            WizardStep::Location => self.location,
            WizardStep::Evidence => self.evidence,
        }
    }
}

/// Fields of the first step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub river_name: String,
    pub pollution_type: Option<PollutionType>,
    pub description: String,
    pub severity_level: Severity,
}

/// Partial update of the editable text fields; absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    pub river_name: Option<String>,
    pub pollution_type: Option<PollutionType>,
    pub description: Option<String>,
    pub severity_level: Option<Severity>,
    pub location_notes: Option<String>,
}

/// Serializable view of a wizard for the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView<'a> {
    pub step: WizardStep,
    pub step_number: u8,
    pub basic_info: &'a BasicInfo,
    pub location: Option<&'a PickedLocation>,
    pub location_notes: &'a str,
    pub images: Vec<ImageView<'a>>,
    pub max_images: usize,
    pub can_add_more_images: bool,
    pub submitting: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView<'a> {
    #[serde(flatten)]
    pub file: &'a SelectedFile,
    pub preview_url: &'a str,
}

/// State of one report being composed.
#[derive(Debug)]
pub struct ReportWizard {
    step: WizardStep,
    validation: StepValidation,
    pub basic: BasicInfo,
    pub location: LocationPicker,
    pub location_notes: String,
    pub images: ImageUploader,
    submitting: Busy,
}

impl ReportWizard {
    pub fn new(
        previews: Arc<dyn PreviewStore>,
        max_images: usize,
        validation: StepValidation,
    ) -> Self {
        // ---
        Self {
            step: WizardStep::BasicInfo,
            validation,
            basic: BasicInfo::default(),
            location: LocationPicker::default(),
            location_notes: String::new(),
            images: ImageUploader::new(previews, max_images),
            submitting: Busy::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    pub fn apply(&mut self, patch: DraftPatch) {
        // ---
        if let Some(v) = patch.river_name {
            self.basic.river_name = v;
        }
        if let Some(v) = patch.pollution_type {
            self.basic.pollution_type = Some(v);
        }
        if let Some(v) = patch.description {
            self.basic.description = v;
        }
        if let Some(v) = patch.severity_level {
            self.basic.severity_level = v;
        }
        if let Some(v) = patch.location_notes {
            self.location_notes = v;
        }
    }

    /// Advance one step, subject to the current step's gate.
    pub fn next(&mut self) -> Result<WizardStep> {
        // ---
        if self.validation.gates(self.step) {
            self.check(self.step)?;
        }
        if let Some(next) = self.step.next() {
            tracing::debug!("Wizard step {:?} -> {:?}", self.step, next);
            self.step = next;
        }
        Ok(self.step)
    }

    /// Go back one step. Never gated.
    pub fn previous(&mut self) -> WizardStep {
        // ---
        if let Some(prev) = self.step.previous() {
            tracing::debug!("Wizard step {:?} -> {:?}", self.step, prev);
            self.step = prev;
        }
        self.step
    }

    /// Check the required fields of one step regardless of configuration.
    pub fn check(&self, step: WizardStep) -> Result<()> {
        // ---
        match step {
            WizardStep::BasicInfo => {
                let b = &self.basic;
                if b.river_name.trim().is_empty()
                    || b.pollution_type.is_none()
                    || b.description.trim().is_empty()
                {
                    return Err(AppError::validation(
                        "Missing information",
                        "Please fill in all required fields.",
                    ));
                }
            }
            WizardStep::Location => {
                if self.location.current().is_none() {
                    return Err(AppError::validation(
                        "Missing location",
                        "Please select where the pollution was observed.",
                    ));
                }
            }
            WizardStep::Evidence => {
                if self.images.files().is_empty() {
                    return Err(AppError::validation(
                        "Missing evidence",
                        "Please upload at least one photo of the pollution.",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Start a submission from the Evidence step.
    ///
    /// Returns the payload together with the in-flight token; dropping the
    /// token (on success or failure) re-enables submitting.
    pub fn begin_submit(&self) -> Result<(BusyToken, ReportPayload)> {
        // ---
        if self.step != WizardStep::Evidence {
            return Err(AppError::InvalidTransition(format!(
                "Reports can only be submitted from the evidence step (currently step {})",
                self.step.number()
            )));
        }

        for step in [WizardStep::BasicInfo, WizardStep::Location, WizardStep::Evidence] {
            if self.validation.gates(step) {
                self.check(step)?;
            }
        }

        let token = self
            .submitting
            .try_acquire()
            .ok_or_else(|| AppError::Conflict("This report is already being submitted".into()))?;

        Ok((token, self.payload()))
    }

    pub fn payload(&self) -> ReportPayload {
        // ---
        ReportPayload {
            river_name: self.basic.river_name.trim().to_string(),
            pollution_type: self.basic.pollution_type,
            description: self.basic.description.clone(),
            severity_level: self.basic.severity_level,
            images: self.images.files().to_vec(),
            location: self.location.current().map(|l| l.point),
        }
    }

    pub fn view(&self) -> WizardView<'_> {
        // ---
        let images = self
            .images
            .files()
            .iter()
            .zip(self.images.preview_urls())
            .map(|(file, preview_url)| ImageView { file, preview_url })
            .collect();

        WizardView {
            step: self.step,
            step_number: self.step.number(),
            basic_info: &self.basic,
            location: self.location.current(),
            location_notes: &self.location_notes,
            images,
            max_images: self.images.max_images(),
            can_add_more_images: self.images.can_add_more(),
            submitting: self.is_submitting(),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::location::ClientPosition;
    use crate::models::GeoPoint;
    use crate::submit::{Backend, SimulatedBackend};
    use crate::uploader::{BlobPreviews, UploadSource};

    fn wizard(validation: StepValidation) -> ReportWizard {
        ReportWizard::new(Arc::new(BlobPreviews::default()), 5, validation)
    }

    fn fill_basic(w: &mut ReportWizard) {
        w.apply(DraftPatch {
            river_name: Some("Yamuna".into()),
            pollution_type: Some(PollutionType::Industrial),
            description: Some("test".into()),
            severity_level: Severity::new(3),
            location_notes: None,
        });
    }

    #[test]
    fn test_linear_transitions_with_noops_at_ends() {
        // ---
        let mut w = wizard(StepValidation::default());
        assert_eq!(w.step(), WizardStep::BasicInfo);
        assert_eq!(w.previous(), WizardStep::BasicInfo);

        assert_eq!(w.next().unwrap(), WizardStep::Location);
        assert_eq!(w.next().unwrap(), WizardStep::Evidence);
        assert_eq!(w.next().unwrap(), WizardStep::Evidence);

        assert_eq!(w.previous(), WizardStep::Location);
        assert_eq!(w.previous(), WizardStep::BasicInfo);
    }

    #[test]
    fn test_ungated_wizard_advances_with_empty_fields() {
        // ---
        let mut w = wizard(StepValidation::default());
        w.next().unwrap();
        w.next().unwrap();
        assert_eq!(w.step(), WizardStep::Evidence);
        assert!(w.begin_submit().is_ok());
    }

    #[test]
    fn test_gates_block_advance_until_fields_present() {
        // ---
        let mut w = wizard(StepValidation {
            basic_info: true,
            location: true,
            evidence: false,
        });

        assert!(matches!(w.next(), Err(AppError::Validation { .. })));
        assert_eq!(w.step(), WizardStep::BasicInfo);

        fill_basic(&mut w);
        assert_eq!(w.next().unwrap(), WizardStep::Location);
        assert!(w.next().is_err());

        let here = ClientPosition {
            position: Some(GeoPoint::new(28.56, 77.30)),
            error: None,
        };
        w.location.use_current_location(&here).unwrap();
        assert_eq!(w.next().unwrap(), WizardStep::Evidence);
    }

    #[test]
    fn test_evidence_gate_applies_on_submit() {
        // ---
        let mut w = wizard(StepValidation {
            evidence: true,
            ..StepValidation::default()
        });
        w.next().unwrap();
        w.next().unwrap();
        assert!(matches!(w.begin_submit(), Err(AppError::Validation { .. })));

        let photo = SelectedFile {
            name: "okhla.jpg".into(),
            content_type: "image/jpeg".into(),
            size_bytes: 2048,
        };
        w.images.add(vec![photo], UploadSource::Picker);
        assert!(w.begin_submit().is_ok());
    }

    #[test]
    fn test_submit_only_from_evidence() {
        // ---
        let mut w = wizard(StepValidation::default());
        assert!(matches!(w.begin_submit(), Err(AppError::InvalidTransition(_))));
        w.next().unwrap();
        assert!(matches!(w.begin_submit(), Err(AppError::InvalidTransition(_))));
        w.next().unwrap();
        assert!(w.begin_submit().is_ok());
    }

    #[test]
    fn test_one_submission_in_flight() {
        // ---
        let mut w = wizard(StepValidation::default());
        w.next().unwrap();
        w.next().unwrap();

        let (token, _) = w.begin_submit().unwrap();
        assert!(w.is_submitting());
        assert!(matches!(w.begin_submit(), Err(AppError::Conflict(_))));

        // edits are not blocked while submitting
        w.apply(DraftPatch {
            description: Some("more detail".into()),
            ..DraftPatch::default()
        });
        assert_eq!(w.basic.description, "more detail");

        drop(token);
        assert!(!w.is_submitting());
        assert!(w.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_failed_submission_preserves_state() {
        // ---
        let backend = SimulatedBackend::instant().failing("Please try again later");
        let mut w = wizard(StepValidation::default());
        fill_basic(&mut w);
        w.next().unwrap();
        w.next().unwrap();

        let (token, payload) = w.begin_submit().unwrap();
        let result = backend.submit_report(payload).await;
        drop(token);

        assert!(matches!(result, Err(AppError::Operation { .. })));
        assert_eq!(w.step(), WizardStep::Evidence);
        assert_eq!(w.basic.river_name, "Yamuna");
        assert!(w.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_yamuna_report_without_location_or_images_succeeds() {
        // ---
        let backend = SimulatedBackend::instant();
        let mut w = wizard(StepValidation::default());
        fill_basic(&mut w);
        w.next().unwrap();
        w.next().unwrap();

        let (_token, payload) = w.begin_submit().unwrap();
        assert_eq!(payload.river_name, "Yamuna");
        assert_eq!(payload.pollution_type, Some(PollutionType::Industrial));
        assert_eq!(payload.severity_level.level(), 3);
        assert!(payload.location.is_none());
        assert!(payload.images.is_empty());

        assert!(backend.submit_report(payload).await.is_ok());
    }

    #[test]
    fn test_view_pairs_files_with_previews() {
        // ---
        let mut w = wizard(StepValidation::default());
        let photo = |n: &str| SelectedFile {
            name: n.into(),
            content_type: "image/png".into(),
            size_bytes: 1,
        };
        w.images.add(vec![photo("a.png"), photo("b.png")], UploadSource::Drop);

        let view = w.view();
        assert_eq!(view.step_number, 1);
        assert_eq!(view.images.len(), 2);
        assert_eq!(view.images[1].file.name, "b.png");
        assert!(view.images[0].preview_url.starts_with("blob:"));
        assert!(view.can_add_more_images);
    }
}
