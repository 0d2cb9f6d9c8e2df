//! Weight-based parser backend selection.

use crate::parsers::ParserBackend;
use std::path::Path;
use tracing::debug;

/// Probe every registered backend and pick the one with the strictly highest
/// weight; ties resolve to the earliest-registered backend.
///
/// Returns `None` when no backend accepts the file.
pub fn select_backend<'a>(
    backends: &'a [Box<dyn ParserBackend>],
    path: &Path,
) -> Option<&'a dyn ParserBackend> {
    let mut best: Option<(&'a dyn ParserBackend, i32)> = None;

    for backend in backends {
        let Some(weight) = backend.probe(path) else {
            continue;
        };
        debug!(
            "Backend {} accepts {} with weight {}",
            backend.name(),
            path.display(),
            weight
        );

        match best {
            Some((_, top)) if weight <= top => {}
            _ => best = Some((backend.as_ref(), weight)),
        }
    }

    best.map(|(backend, _)| backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubBackend;

    fn registry(entries: &[(&'static str, i32)]) -> Vec<Box<dyn ParserBackend>> {
        entries
            .iter()
            .map(|(name, weight)| {
                Box::new(StubBackend::new(name, "pdf", *weight, "")) as Box<dyn ParserBackend>
            })
            .collect()
    }

    #[test]
    fn test_highest_weight_wins_regardless_of_order() {
        let path = Path::new("doc.pdf");

        let backends = registry(&[("low", 5), ("high", 10)]);
        assert_eq!(select_backend(&backends, path).unwrap().name(), "high");

        let backends = registry(&[("high", 10), ("low", 5)]);
        assert_eq!(select_backend(&backends, path).unwrap().name(), "high");
    }

    #[test]
    fn test_ties_resolve_to_first_registered() {
        let backends = registry(&[("first", 7), ("second", 7)]);
        assert_eq!(
            select_backend(&backends, Path::new("doc.pdf")).unwrap().name(),
            "first"
        );
    }

    #[test]
    fn test_no_acceptance_yields_none() {
        let backends = registry(&[("pdf-only", 5)]);
        assert!(select_backend(&backends, Path::new("doc.txt")).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let backends = registry(&[("a", 3), ("b", 9), ("c", 6)]);
        for _ in 0..10 {
            assert_eq!(
                select_backend(&backends, Path::new("doc.pdf")).unwrap().name(),
                "b"
            );
        }
    }
}
