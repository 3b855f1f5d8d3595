//! Page count estimation
//!
//! Walks measured sections in document order and predicts which page each
//! one lands on once the browser paginates the document for print. The
//! result decides where trailing blank pages start, and which sections
//! need an explicit page break so the printed layout matches the estimate.

use tracing::debug;

use crate::error::{Error, Result};
use crate::layout::PageGeometry;

/// One measurable content block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Rendered height in CSS pixels, measured after style normalization
    pub height: f64,
    /// Position within the owning group
    pub index: usize,
}

/// Layout container whose sections are paginated together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentGroup {
    pub sections: Vec<Section>,
}

impl ContentGroup {
    /// Build a group from heights in document order
    ///
    /// Heights must be finite and non-negative; anything else means the
    /// layout engine did not report real geometry.
    pub fn from_heights(heights: &[f64]) -> Result<Self> {
        let sections = heights
            .iter()
            .enumerate()
            .map(|(index, &height)| {
                if !height.is_finite() || height < 0.0 {
                    return Err(Error::Measurement(format!(
                        "section {} reported height {}",
                        index, height
                    )));
                }
                Ok(Section { height, index })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sections })
    }
}

/// Decode the JSON array of per-group heights produced by the measuring script
pub fn groups_from_json(json: &str) -> Result<Vec<ContentGroup>> {
    let heights: Vec<Vec<f64>> = serde_json::from_str(json)?;
    heights
        .iter()
        .map(|group| ContentGroup::from_heights(group))
        .collect()
}

/// Address of a section within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SectionRef {
    pub group: usize,
    pub section: usize,
}

/// Where a section ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Fits below the previous section
    Fits,
    /// Moved to the top of the next page
    NextPage { forced_break: bool },
    /// Taller than a page; spans `pages` pages starting on a fresh one
    Oversized { pages: u32 },
}

/// Running state while sections are placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEstimate {
    /// Vertical space consumed on the current page
    pub used_height: f64,
    /// 1-based page the next section would start on
    pub current_page: u32,
}

impl PageEstimate {
    /// Fresh state at the top of the first page
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            used_height: geometry.first_page_margin.px(),
            current_page: 1,
        }
    }

    /// Place one section and advance the state
    pub fn place(&mut self, section: &Section, geometry: &PageGeometry) -> Placement {
        let page_height = geometry.page_height.px();
        let effective = section.height + geometry.section_padding.px();

        if effective >= page_height {
            // float to int casts saturate, so absurd heights pin at u32::MAX
            let pages = (effective / page_height).ceil() as u32;
            self.current_page = self.current_page.saturating_add(pages);
            self.used_height = effective % page_height;
            Placement::Oversized { pages }
        } else if self.used_height + effective + geometry.section_margin.px() >= page_height {
            self.used_height = effective;
            self.current_page = self.current_page.saturating_add(1);
            Placement::NextPage {
                forced_break: section.index != 0,
            }
        } else {
            self.used_height += effective;
            Placement::Fits
        }
    }
}

/// Outcome of one estimator run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationPlan {
    /// Last page expected to hold content, 0 when measurement failed
    pub last_page: u32,
    /// Sections that must start on a new page, in document order
    pub page_breaks: Vec<SectionRef>,
}

impl PaginationPlan {
    /// Whether the plan carries a usable estimate
    pub fn is_usable(&self) -> bool {
        self.last_page > 0
    }
}

/// Estimate how many pages the groups occupy once printed
///
/// A document without sections still occupies the first page. A plan
/// with `last_page == 0` only comes from [`PaginationPlan::default`], which
/// callers use when measurement failed.
pub fn estimate_pages(groups: &[ContentGroup], geometry: &PageGeometry) -> PaginationPlan {
    let mut plan = PaginationPlan::default();
    let mut state = PageEstimate::new(geometry);
    for (group_index, group) in groups.iter().enumerate() {
        for section in &group.sections {
            let placement = state.place(section, geometry);
            debug!(
                group = group_index,
                section = section.index,
                height = section.height,
                page = state.current_page,
                ?placement,
                "placed section"
            );

            let forced = match placement {
                Placement::Oversized { .. } => true,
                Placement::NextPage { forced_break } => forced_break,
                Placement::Fits => false,
            };
            if forced {
                plan.page_breaks.push(SectionRef {
                    group: group_index,
                    section: section.index,
                });
            }
        }
    }

    plan.last_page = state.current_page;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(heights: &[f64]) -> ContentGroup {
        ContentGroup::from_heights(heights).unwrap()
    }

    #[test]
    fn test_small_sections_fit_on_one_page() {
        let geometry = PageGeometry::default();
        let plan = estimate_pages(&[group(&[100.0, 120.0, 80.0])], &geometry);

        assert_eq!(plan.last_page, 1);
        assert!(plan.page_breaks.is_empty());
    }

    #[test]
    fn test_oversized_section_jumps_pages() {
        let geometry = PageGeometry::default();
        let page = geometry.page_height.px();
        // effective = 3 * page exactly
        let plan = estimate_pages(&[group(&[3.0 * page - 40.0])], &geometry);

        assert!(plan.last_page >= 4);
        assert_eq!(plan.page_breaks, vec![SectionRef { group: 0, section: 0 }]);
    }

    #[test]
    fn test_oversized_keeps_remainder() {
        let geometry = PageGeometry::default();
        let mut state = PageEstimate::new(&geometry);
        let section = Section { height: 1500.0, index: 0 };

        let placement = state.place(&section, &geometry);

        assert_eq!(placement, Placement::Oversized { pages: 2 });
        assert_eq!(state.current_page, 3);
        assert!((state.used_height - (1540.0 - 1122.0)).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_starts_new_page_with_exact_height() {
        let geometry = PageGeometry::default();
        let mut state = PageEstimate::new(&geometry);
        state.used_height = 900.0;
        // 900 + 140 + 130 >= 1122
        let section = Section { height: 100.0, index: 2 };

        let placement = state.place(&section, &geometry);

        assert_eq!(placement, Placement::NextPage { forced_break: true });
        assert_eq!(state.current_page, 2);
        assert_eq!(state.used_height, 140.0);
    }

    #[test]
    fn test_first_section_in_group_moves_without_break() {
        let geometry = PageGeometry::default();
        // first group fills most of page one
        let groups = vec![group(&[400.0, 200.0]), group(&[200.0, 50.0])];

        let plan = estimate_pages(&groups, &geometry);

        // 250 + 440 + 240 = 930; 930 + 240 + 130 overflows on the second
        // group's first section, which moves without an explicit break
        assert_eq!(plan.last_page, 2);
        assert!(plan.page_breaks.is_empty());
    }

    #[test]
    fn test_second_section_overflow_records_break() {
        let geometry = PageGeometry::default();
        let plan = estimate_pages(&[group(&[600.0, 300.0])], &geometry);

        // 250 + 640 = 890; 890 + 340 + 130 overflows
        assert_eq!(plan.last_page, 2);
        assert_eq!(plan.page_breaks, vec![SectionRef { group: 0, section: 1 }]);
    }

    #[test]
    fn test_boundary_counts_as_overflow() {
        let geometry = PageGeometry::default();
        let mut state = PageEstimate::new(&geometry);
        // 250 + 742 + 130 == 1122
        let section = Section { height: 702.0, index: 1 };

        assert_eq!(
            state.place(&section, &geometry),
            Placement::NextPage { forced_break: true }
        );
    }

    #[test]
    fn test_no_sections_stays_on_first_page() {
        let geometry = PageGeometry::default();

        let plan = estimate_pages(&[], &geometry);
        assert_eq!(plan.last_page, 1);
        assert!(plan.page_breaks.is_empty());

        assert_eq!(estimate_pages(&[ContentGroup::default()], &geometry).last_page, 1);
        assert!(!PaginationPlan::default().is_usable());
    }

    #[test]
    fn test_huge_sections_saturate_page_count() {
        let geometry = PageGeometry::default();

        let plan = estimate_pages(&groups_from_json("[[3e12, 3e12]]").unwrap(), &geometry);
        assert_eq!(plan.last_page, u32::MAX);
        assert_eq!(plan.page_breaks.len(), 2);

        let plan = estimate_pages(&groups_from_json("[[1e300]]").unwrap(), &geometry);
        assert_eq!(plan.last_page, u32::MAX);
    }

    #[test]
    fn test_next_page_saturates() {
        let geometry = PageGeometry::default();
        let mut state = PageEstimate {
            used_height: 1000.0,
            current_page: u32::MAX,
        };

        state.place(&Section { height: 100.0, index: 1 }, &geometry);

        assert_eq!(state.current_page, u32::MAX);
    }

    #[test]
    fn test_rejects_bad_heights() {
        assert!(matches!(
            ContentGroup::from_heights(&[10.0, -1.0]),
            Err(Error::Measurement(_))
        ));
        assert!(ContentGroup::from_heights(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_groups_from_json() {
        let groups = groups_from_json("[[10.5, 20], [], [30]]").unwrap();

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].sections[1], Section { height: 20.0, index: 1 });
        assert!(groups[1].sections.is_empty());
        assert!(groups_from_json("{\"bad\": 1}").is_err());
    }
}
