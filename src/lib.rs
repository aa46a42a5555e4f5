/*!
mcenoc-sroute
=====

This crate computes static, non-blocking routes for multistage interconnection networks of 2x2 switches. Given a set of `source--destination` pairs with no repeated source and no repeated destination it produces, for each port, a fixed-length header with one bit per traversed stage. Each switch reads its bit and decides locally whether to cross, and every source reaches its destination without contention.

# Usage

```ignore
mcenoc-sroute [options] <network.tikz> [<src--dst>...]
mcenoc-sroute [options] --ports=16 [<src--dst>...]
```

Without pairs a random permutation is routed. Options:

* `-p`, `--print`: print the header of every port.
* `-a FILE`, `--annotate=FILE`: write the network diagram with the switch settings drawn over it.
* `-m NAME`, `--mode=NAME`: `benes` (default) routes any permutation by the looping algorithm; `sorted` assigns headers in a single pass for unique-path fabrics.
* `--output-select`: headers tell the output each switch delivers to instead of whether it crosses.
* `-n N`, `--ports=N` and `-s S`, `--midswitches=S`: describe the fabric without a network file.
* `--seed=SEED`: seed for the random permutation.
* `--check=TRIALS`: route that many random permutations and verify every header.

Logging is controlled by `RUST_LOG`.

# Library

* [topology] holds the fabric parameters and the fixed inter-stage wiring.
* [permutation] validates requests.
* [routing] has the [StaticRouting](routing::StaticRouting) implementations, the looping decomposition and the header extraction.
* [annotate] writes annotated diagrams.

*/

pub mod annotate;
pub mod error;
pub mod header;
pub mod permutation;
pub mod routing;
pub mod topology;

use std::time::Instant;

use tracing::info;

pub use crate::error::{Endpoint,RouteError};
pub use crate::header::{HeaderEncoding,HeaderSet,RouteHeader};
pub use crate::permutation::{PermutationEntry,PermutationRequest};
pub use crate::routing::{new_static_routing,RoutedRequest,StaticRouting};
pub use crate::topology::{NetworkDescription,TopologyParameters};

///Route `request` with `routing`, reporting how long it took.
pub fn route_request(routing:&dyn StaticRouting, request:&PermutationRequest, topology:&TopologyParameters) -> Result<RoutedRequest,RouteError>
{
	let start = Instant::now();
	let routed = routing.route(request,topology)?;
	info!(routing=routing.name(),pairs=request.len(),"routed permutation in {:.4} seconds",start.elapsed().as_secs_f64());
	Ok(routed)
}
