//! Backend trial-order resolution

use crate::backends::BackendKind;
use crate::types::Strategy;

/// Resolve the ordered failover chain for a strategy
///
/// Pure and total. The direct backend is always present exactly once:
/// first for `CostEffective` and `SpeedFirst`, last for `QualityFirst`.
/// Optional backends appear only when enabled.
pub fn resolve_order(
    strategy: Strategy,
    reader_enabled: bool,
    scrape_api_enabled: bool,
) -> Vec<BackendKind> {
    let mut order = Vec::with_capacity(3);

    match strategy {
        Strategy::CostEffective => {
            order.push(BackendKind::Direct);
            if reader_enabled {
                order.push(BackendKind::Reader);
            }
            if scrape_api_enabled {
                order.push(BackendKind::ScrapeApi);
            }
        }
        Strategy::SpeedFirst => {
            order.push(BackendKind::Direct);
            if scrape_api_enabled {
                order.push(BackendKind::ScrapeApi);
            }
            if reader_enabled {
                order.push(BackendKind::Reader);
            }
        }
        Strategy::QualityFirst => {
            if scrape_api_enabled {
                order.push(BackendKind::ScrapeApi);
            }
            if reader_enabled {
                order.push(BackendKind::Reader);
            }
            // Direct needs no credentials and is always available
            order.push(BackendKind::Direct);
        }
    }

    order
}
