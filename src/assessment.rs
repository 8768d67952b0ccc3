//! One form submission end to end: encode, predict, present.
//!
//! Every failure is terminal for the submission. No partial verdict is produced.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    classifier::{Classifier, PredictError},
    encoding::{EncodeError, FeatureEncoder, FeatureRecord, RawSelection},
    model_store::ModelError,
    presenter::{PresentError, Verdict, present},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Prediction failed: {0}")]
    Predict(#[from] PredictError),
    #[error("Cannot present prediction: {0}")]
    Present(#[from] PresentError),
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub record: FeatureRecord,
    pub class_index: usize,
    pub probabilities: Vec<f32>,
    pub verdict: Verdict,
}

/// Encode `raw` and run it through `classifier`.
pub fn assess(
    encoder: &FeatureEncoder,
    classifier: &dyn Classifier,
    raw: &RawSelection,
) -> Result<Assessment, AssessmentError> {
    let record = encoder.encode(raw)?;
    debug!(bmi = ?record.bmi(), "Submission encoded");

    let probabilities = classifier.predict_proba(&record)?;
    let class_index = classifier.predict(&record)?;
    let verdict = present(classifier.classes(), class_index, &probabilities)?;
    info!(
        class = %verdict.class_id,
        probability = verdict.probability,
        "Assessment complete"
    );
    Ok(Assessment {
        record,
        class_index,
        probabilities,
        verdict,
    })
}

/// Like [`assess`], but takes the classifier as resolved from a
/// [`ModelHandle`](crate::model_store::ModelHandle), so an unavailable model
/// blocks the submission before anything is encoded.
pub fn assess_with_model<C>(
    encoder: &FeatureEncoder,
    classifier: Result<C, ModelError>,
    raw: &RawSelection,
) -> Result<Assessment, AssessmentError>
where
    C: AsRef<dyn Classifier>,
{
    let classifier = classifier?;
    assess(encoder, classifier.as_ref(), raw)
}
