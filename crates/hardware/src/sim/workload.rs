//! Synthetic workloads.
//!
//! Each workload reproduces the memory-access stream of a small benchmark
//! kernel used to compare replacement policies:
//!
//! - **Streaming:** initialise an array of `u64` then sum it (two sequential passes).
//! - **High locality:** repeatedly increment every element of a small hot array.
//! - **Stencil:** 1-D three-point stencil over two ping-pong grids.
//! - **Phase change:** alternates a dense matrix multiply (locality) with stencil sweeps (streaming).
//! - **Scan:** one pass over `lines` consecutive lines, touching each once.
//!
//! Streams are lazy iterators of byte addresses. Arrays live in disjoint
//! regions so different arrays never share a line.

/// Size of a C `int`.
const INT: u64 = 4;
/// Size of a `u64`.
const WORD: u64 = 8;

/// Base address of the first array of a workload.
const REGION_A: u64 = 0x1000_0000;
/// Base address of the second array.
const REGION_B: u64 = 0x2000_0000;
/// Base address of the third array.
const REGION_C: u64 = 0x3000_0000;
/// Base address of the first stencil grid.
const REGION_GRID_0: u64 = 0x4000_0000;
/// Base address of the second stencil grid.
const REGION_GRID_1: u64 = 0x5000_0000;

/// A boxed stream of byte addresses.
pub type AddressStream = Box<dyn Iterator<Item = u64> + Send>;

/// Names accepted by [`Workload::preset`].
pub const PRESETS: &[&str] = &[
    "streaming",
    "streaming_light",
    "high_locality",
    "high_locality_light",
    "stencil",
    "stencil_light",
    "phase_change",
    "phase_change_light",
];

/// A synthetic memory-access pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    /// Sequential write then sequential read of `bytes` bytes of `u64`s.
    Streaming {
        /// Array size in bytes.
        bytes: u64,
    },
    /// `iters` passes over `hot_ints` ints.
    HighLocality {
        /// Hot array length in ints.
        hot_ints: u64,
        /// Number of passes.
        iters: u64,
    },
    /// Three-point stencil over two grids of `ints` ints for `timesteps` steps.
    Stencil {
        /// Grid length in ints.
        ints: u64,
        /// Number of sweeps.
        timesteps: u64,
    },
    /// `phases` alternating phases; even phases multiply `matrix` x `matrix`
    /// int matrices, odd phases run `timesteps_per_phase` stencil sweeps.
    PhaseChange {
        /// Matrix dimension.
        matrix: u64,
        /// Stencil grid length in ints.
        stencil_ints: u64,
        /// Stencil sweeps per streaming phase.
        timesteps_per_phase: u64,
        /// Total number of phases.
        phases: u64,
    },
    /// Touch `lines` consecutive lines once each, starting at `start`.
    Scan {
        /// First byte address.
        start: u64,
        /// Number of lines.
        lines: u64,
        /// Line size in bytes.
        line_bytes: u64,
    },
}

impl Workload {
    /// Looks up a named preset. Full-size presets match the original
    /// benchmark parameters; `_light` presets are scaled down for quick runs.
    pub const fn preset(name: &str) -> Option<Self> {
        let w = match name.as_bytes() {
            b"streaming" => Self::Streaming {
                bytes: 4 * 1024 * 1024,
            },
            b"streaming_light" => Self::Streaming { bytes: 256 * 1024 },
            b"high_locality" => Self::HighLocality {
                hot_ints: 128,
                iters: 10_000,
            },
            b"high_locality_light" => Self::HighLocality {
                hot_ints: 128,
                iters: 1_000,
            },
            b"stencil" => Self::Stencil {
                ints: 16_384,
                timesteps: 30,
            },
            b"stencil_light" => Self::Stencil {
                ints: 4_096,
                timesteps: 5,
            },
            b"phase_change" => Self::PhaseChange {
                matrix: 64,
                stencil_ints: 16_384,
                timesteps_per_phase: 15,
                phases: 6,
            },
            b"phase_change_light" => Self::PhaseChange {
                matrix: 32,
                stencil_ints: 4_096,
                timesteps_per_phase: 3,
                phases: 4,
            },
            _ => return None,
        };
        Some(w)
    }

    /// The workload split into labelled phases.
    ///
    /// Single-phase workloads return one phase named after the workload.
    pub fn phases(self) -> Vec<(String, AddressStream)> {
        match self {
            Self::Streaming { bytes } => vec![("streaming".to_owned(), streaming(bytes))],
            Self::HighLocality { hot_ints, iters } => {
                vec![("high_locality".to_owned(), high_locality(hot_ints, iters))]
            }
            Self::Stencil { ints, timesteps } => {
                vec![("stencil".to_owned(), stencil(ints, timesteps))]
            }
            Self::PhaseChange {
                matrix,
                stencil_ints,
                timesteps_per_phase,
                phases,
            } => (0..phases)
                .map(|p| {
                    if p % 2 == 0 {
                        (format!("phase{p}:locality"), matmul(matrix))
                    } else {
                        (
                            format!("phase{p}:streaming"),
                            stencil(stencil_ints, timesteps_per_phase),
                        )
                    }
                })
                .collect(),
            Self::Scan {
                start,
                lines,
                line_bytes,
            } => {
                let stream: AddressStream = Box::new((0..lines).map(move |i| start + i * line_bytes));
                vec![("scan".to_owned(), stream)]
            }
        }
    }

    /// The whole workload as one stream.
    pub fn addresses(self) -> AddressStream {
        Box::new(self.phases().into_iter().flat_map(|(_, stream)| stream))
    }
}

fn streaming(bytes: u64) -> AddressStream {
    let n = bytes / WORD;
    let pass = move || (0..n).map(|i| REGION_A + i * WORD);
    Box::new(pass().chain(pass()))
}

fn high_locality(hot_ints: u64, iters: u64) -> AddressStream {
    Box::new((0..iters).flat_map(move |_| (0..hot_ints).map(|i| REGION_A + i * INT)))
}

/// One sweep reads `cur[i-1], cur[i], cur[i+1]` and writes `next[i]`; the
/// grids swap roles every timestep.
fn stencil(ints: u64, timesteps: u64) -> AddressStream {
    Box::new((0..timesteps).flat_map(move |t| {
        let (cur, next) = if t % 2 == 0 {
            (REGION_GRID_0, REGION_GRID_1)
        } else {
            (REGION_GRID_1, REGION_GRID_0)
        };
        (1..ints.saturating_sub(1)).flat_map(move |i| {
            [
                cur + (i - 1) * INT,
                cur + i * INT,
                cur + (i + 1) * INT,
                next + i * INT,
            ]
        })
    }))
}

/// `C[i][j] += A[i][k] * B[k][j]`, row-major; `C[i][j]` is read once before
/// the inner loop and written once after it.
fn matmul(n: u64) -> AddressStream {
    Box::new((0..n).flat_map(move |i| {
        (0..n).flat_map(move |j| {
            let c = REGION_C + (i * n + j) * INT;
            let inner = (0..n).flat_map(move |k| {
                [REGION_A + (i * n + k) * INT, REGION_B + (k * n + j) * INT]
            });
            std::iter::once(c).chain(inner).chain(std::iter::once(c))
        })
    }))
}
