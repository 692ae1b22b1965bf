pub mod core;
pub mod storage;
pub mod memory;
pub mod reader;

pub use crate::core::config::Config;
pub use crate::core::database::{DatabaseHandler, StreamDatabase};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{CatalogMode, LogicalStream, StreamId};

/*
┌───────────────────────────────────────────────────────────────────────────────┐
│                        PIRSTREAM STRUCT ARCHITECTURE                          │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── CORE LAYER ───────────────────────────────────┐
│                                                                               │
│  ┌─────────────────────────────────────────────────────────────────────────┐ │
│  │                        struct StreamDatabase                            │ │
│  │  config: Config                   // dir, stream count, pool size      │ │
│  │  catalog: Arc<Catalog>            // read-only after the startup scan  │ │
│  │  pool: Arc<HandlePool>            // bounded file handle slots         │ │
│  │  counters: Arc<ReadCounters>      // stream/aggregated reads, bytes    │ │
│  │  aggregated: AggregatedReader     // owns the StreamReader + rayon     │ │
│  └─────────────────────────────────────────────────────────────────────────┘ │
│                                                                               │
│  trait DatabaseHandler   ← consumed by the PIR query engine                   │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── STORAGE LAYER ────────────────────────────────┐
│                                                                               │
│  StreamCatalog::scan(dir, n) ──> Catalog                                      │
│    • every regular file: FileSizeProbe → max_file_size                        │
│    • name "i" with i < n  → real stream i                                     │
│    • anything else        → CatalogAnomaly                                    │
│  Catalog::get_catalog(Verbose) = "0\n" n { name size }                         │
│  Catalog::get_catalog(Compact) = "1\n" n max_file_size                         │
└───────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── READ PATH ────────────────────────────────────┐
│                                                                               │
│  AggregatedReader ──per stream──> StreamReader ──borrow──> HandlePool         │
│        │                               │                                      │
│        │                               ├─ real: open + seek + read + pad      │
│        │                               └─ fake: zeros                         │
│        └─ slots past the catalog end: zeros                                   │
└───────────────────────────────────────────────────────────────────────────────┘
*/
