/**
 * Responsibility
 *  - one tagged id type per catalog resource, so a disease id can't be passed
 *    where a treatment id is expected
 *
 * Everything declared `pub` here is re-exported through ./mod.rs.
 */
use super::core::PublicId;

pub enum DiseaseTag {}
pub type PublicDiseaseId = PublicId<DiseaseTag>;

pub enum CategoryTag {}
pub type PublicCategoryId = PublicId<CategoryTag>;

pub enum TreatmentTag {}
pub type PublicTreatmentId = PublicId<TreatmentTag>;

pub enum ImageTag {}
pub type PublicImageId = PublicId<ImageTag>;

pub enum DiagnosisTag {}
pub type PublicDiagnosisId = PublicId<DiagnosisTag>;

pub enum ReviewTag {}
pub type PublicReviewId = PublicId<ReviewTag>;
