//! Two-photograph entry point: enhance both inputs, then compare the masks.
use crate::compare::Comparator;
use crate::diagnostics::{EnhanceReport, TimingBreakdown};
use crate::enhance::Enhancer;
use crate::error::Result;
use crate::image::ImageU8;
use crate::params::MatchParams;
use crate::types::MatchReport;
use log::info;
use std::time::Instant;

/// Owns an [`Enhancer`] and a [`Comparator`] built from one parameter set.
#[derive(Clone, Debug)]
pub struct RetinaMatcher {
    params: MatchParams,
    enhancer: Enhancer,
    comparator: Comparator,
}

impl Default for RetinaMatcher {
    fn default() -> Self {
        Self::new(MatchParams::default())
    }
}

/// Both enhancement traces plus the comparison outcome.
#[derive(Clone, Debug)]
pub struct DetailedMatch {
    pub first: EnhanceReport,
    pub second: EnhanceReport,
    pub report: MatchReport,
}

impl RetinaMatcher {
    pub fn new(params: MatchParams) -> Self {
        let enhancer = Enhancer::new(params.enhance.clone());
        let comparator = Comparator::new(params.compare.clone());
        Self {
            params,
            enhancer,
            comparator,
        }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    pub fn enhancer(&self) -> &Enhancer {
        &self.enhancer
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Enhance both photographs (in parallel) and compare the first mask
    /// against the second.
    pub fn process(&self, first: ImageU8<'_>, second: ImageU8<'_>) -> Result<MatchReport> {
        self.process_traced(first, second).map(|d| d.report)
    }

    pub fn process_traced(&self, first: ImageU8<'_>, second: ImageU8<'_>) -> Result<DetailedMatch> {
        self.params.validate()?;
        let t0 = Instant::now();
        let (a, b) = rayon::join(
            || self.enhancer.enhance_traced(first),
            || self.enhancer.enhance_traced(second),
        );
        let (a, b) = (a?, b?);
        let mut report = self.comparator.compare(&a.mask, &b.mask)?;

        let mut timing = TimingBreakdown::with_total(t0.elapsed().as_secs_f64() * 1000.0);
        timing.push("enhance.first", a.timing.total_ms);
        timing.push("enhance.second", b.timing.total_ms);
        timing.extend_prefixed("compare", &report.timing);
        report.timing = timing;

        info!(
            "RetinaMatcher: matched={} votes={}/{} masks={}x{} in {:.1} ms",
            report.matched,
            report.votes,
            report.votes_required,
            report.mask_a_size.0,
            report.mask_a_size.1,
            report.timing.total_ms
        );
        Ok(DetailedMatch {
            first: a,
            second: b,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    fn stripes(w: usize, h: usize, period: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let dark = ((x + 2 * y) / period) % 2 == 0;
                let v = if dark { 40 } else { 200 };
                data.extend_from_slice(&[v, v / 2, v / 4]);
            }
        }
        data
    }

    #[test]
    fn same_photo_matches() {
        let (w, h) = (160, 120);
        let data = stripes(w, h, 9);
        let report = RetinaMatcher::default()
            .process(ImageU8::rgb(w, h, &data), ImageU8::rgb(w, h, &data))
            .unwrap();
        assert!(report.matched);
        assert_eq!(report.decision_digit(), "1");
        assert_eq!(report.mask_a_size, report.mask_b_size);
    }

    #[test]
    fn different_sizes_surface_dimension_mismatch() {
        let a = stripes(160, 120, 9);
        let b = stripes(100, 120, 9);
        let err = RetinaMatcher::default()
            .process(ImageU8::rgb(160, 120, &a), ImageU8::rgb(100, 120, &b))
            .unwrap_err();
        assert!(matches!(err, MatchError::DimensionMismatch { .. }));
    }

    #[test]
    fn parts_are_built_from_one_parameter_set() {
        let mut params = MatchParams::default();
        params.compare.votes_required = 5;
        params.enhance.median_kernel = 5;
        let matcher = RetinaMatcher::new(params);
        assert_eq!(matcher.params().compare.votes_required, 5);
        assert_eq!(matcher.comparator().params(), &matcher.params().compare);
        assert_eq!(matcher.enhancer().params().median_kernel, 5);
    }

    #[test]
    fn traced_run_keeps_both_masks() {
        let (w, h) = (96, 80);
        let data = stripes(w, h, 7);
        let detailed = RetinaMatcher::default()
            .process_traced(ImageU8::rgb(w, h, &data), ImageU8::rgb(w, h, &data))
            .unwrap();
        assert_eq!(detailed.first.mask, detailed.second.mask);
        assert!(detailed
            .report
            .timing
            .stages
            .iter()
            .any(|s| s.label == "compare.cells"));
    }
}
