//! Filter-and-paginate engine for permit listings

use crate::query::PermitQuery;
use crate::types::{PageLinks, PageMeta, PaginatedResponse, Permit};

pub const PERMITS_PATH: &str = "/v1/permits";

impl PermitQuery {
    /// Conjunction of every supplied filter. Absent filters always pass.
    pub fn matches(&self, permit: &Permit) -> bool {
        self.submitted_after
            .map_or(true, |after| permit.date_submitted >= after)
            && self
                .submitted_before
                .map_or(true, |before| permit.date_submitted <= before)
            && self.status.map_or(true, |status| permit.status == status)
    }
}

/// Number of pages needed for `total` records, 0 for an empty result.
pub fn total_pages(total: usize, per_page: u32) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as usize)
}

fn page_link(base_path: &str, page: u32, per_page: u32) -> String {
    format!("{}?page={}&perPage={}", base_path, page, per_page)
}

/// Filter `permits`, then cut out the requested page.
///
/// Records keep their original relative order. A page past the end is not an
/// error: it yields empty `data` alongside correct totals.
pub fn paginate(permits: &[Permit], query: &PermitQuery, base_path: &str) -> PaginatedResponse {
    let filtered: Vec<&Permit> = permits.iter().filter(|p| query.matches(p)).collect();

    let total = filtered.len();
    let total_pages = total_pages(total, query.per_page);
    let per_page = query.per_page as usize;
    let start = (query.page.saturating_sub(1) as usize).saturating_mul(per_page);

    let data = filtered
        .iter()
        .skip(start)
        .take(per_page)
        .map(|p| p.simplify())
        .collect();

    let next = ((query.page as usize) < total_pages)
        .then(|| page_link(base_path, query.page + 1, query.per_page));
    let prev = (query.page > 1).then(|| page_link(base_path, query.page - 1, query.per_page));

    PaginatedResponse {
        data,
        meta: PageMeta {
            current_page: query.page,
            total_pages,
            per_page: query.per_page,
            total,
        },
        links: PageLinks {
            self_link: page_link(base_path, query.page, query.per_page),
            next,
            prev,
        },
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::types::{Permit, PermitStatus, PropertyAddress};

    pub fn permit(n: u32, status: PermitStatus, date: &str) -> Permit {
        Permit {
            permit_id: format!("00000000-0000-4000-8000-{:012}", n),
            property_address: PropertyAddress {
                street: format!("{} Ocean Ave", n),
                city: "Sea Bright".to_string(),
                state: "NJ".to_string(),
                zip: "07760".to_string(),
            },
            status,
            date_submitted: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            improvement_amount: serde_json::Number::from(1000 * n),
            documents: Vec::new(),
        }
    }

    /// Twelve permits, two of them Pending, submitted across Jan-Apr 2025
    pub fn twelve() -> Vec<Permit> {
        use PermitStatus::*;
        vec![
            permit(1, Complete, "2025-03-27"),
            permit(2, Pending, "2025-01-15"),
            permit(3, InProgress, "2025-02-03"),
            permit(4, Rejected, "2025-02-20"),
            permit(5, OnHold, "2025-03-02"),
            permit(6, Complete, "2025-01-08"),
            permit(7, InProgress, "2025-04-11"),
            permit(8, Pending, "2025-03-15"),
            permit(9, Complete, "2025-02-11"),
            permit(10, InProgress, "2025-01-28"),
            permit(11, Rejected, "2025-04-02"),
            permit(12, Complete, "2025-03-09"),
        ]
    }
}


#[cfg(test)]
mod proptests {
    use super::fixtures::permit;
    use super::*;
    use crate::types::PermitStatus;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = PermitStatus> {
        prop::sample::select(PermitStatus::ALL.to_vec())
    }

    fn permits_strategy() -> impl Strategy<Value = Vec<Permit>> {
        prop::collection::vec((status_strategy(), 1u32..28, 1u32..13), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (status, day, month))| {
                    permit(i as u32, status, &format!("2025-{:02}-{:02}", month, day))
                })
                .collect()
        })
    }

    fn query_strategy() -> impl Strategy<Value = PermitQuery> {
        (1u32..12, 1u32..=5, prop::option::of(status_strategy())).prop_map(
            |(page, per_page, status)| PermitQuery {
                page,
                per_page,
                status,
                ..PermitQuery::default()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Page size follows min(perPage, max(0, total - (page-1)*perPage))
        #[test]
        fn page_length_matches_formula(permits in permits_strategy(), q in query_strategy()) {
            let page = paginate(&permits, &q, PERMITS_PATH);
            let offset = ((q.page - 1) * q.per_page) as usize;
            let expected = page.meta.total.saturating_sub(offset).min(q.per_page as usize);
            prop_assert_eq!(page.data.len(), expected);
            prop_assert!(page.data.len() <= q.per_page as usize);
        }

        #[test]
        fn total_pages_is_ceiling(permits in permits_strategy(), q in query_strategy()) {
            let page = paginate(&permits, &q, PERMITS_PATH);
            let total = page.meta.total;
            let per_page = q.per_page as usize;
            let expected = if total == 0 { 0 } else { (total + per_page - 1) / per_page };
            prop_assert_eq!(page.meta.total_pages, expected);
        }

        #[test]
        fn links_follow_page_position(permits in permits_strategy(), q in query_strategy()) {
            let page = paginate(&permits, &q, PERMITS_PATH);
            prop_assert_eq!(page.links.next.is_some(), (q.page as usize) < page.meta.total_pages);
            prop_assert_eq!(page.links.prev.is_some(), q.page > 1);
            let expected_self = format!("/v1/permits?page={}&perPage={}", q.page, q.per_page);
            prop_assert_eq!(page.links.self_link, expected_self);
        }

        #[test]
        fn status_filter_is_exact(permits in permits_strategy(), q in query_strategy()) {
            let page = paginate(&permits, &q, PERMITS_PATH);
            if let Some(status) = q.status {
                prop_assert!(page.data.iter().all(|p| p.status == status));
                let expected = permits.iter().filter(|p| p.status == status).count();
                prop_assert_eq!(page.meta.total, expected);
            } else {
                prop_assert_eq!(page.meta.total, permits.len());
            }
        }

        /// Walking every page reproduces the filtered collection in order
        #[test]
        fn pages_partition_filtered_records(permits in permits_strategy(), q in query_strategy()) {
            let first = paginate(&permits, &PermitQuery { page: 1, ..q.clone() }, PERMITS_PATH);
            let mut seen = Vec::new();
            for n in 1..=first.meta.total_pages.max(1) as u32 {
                let page = paginate(&permits, &PermitQuery { page: n, ..q.clone() }, PERMITS_PATH);
                seen.extend(page.data.into_iter().map(|p| p.permit_id));
            }
            let expected: Vec<_> = permits
                .iter()
                .filter(|p| q.matches(p))
                .map(|p| p.permit_id.clone())
                .collect();
            prop_assert_eq!(seen, expected);
        }
    }
}
