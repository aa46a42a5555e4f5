/*!

Static routings: the ways of turning a [PermutationRequest] into route headers.

* [RearrangeableRouting](benes::RearrangeableRouting) routes any permutation through a Beneš fabric of 2x2 switches by the looping algorithm.
* [SimpleSortRouter](sorted::SimpleSortRouter) assigns headers in a single pass, for fabrics in which every permutation has a single physical path.

*/

pub mod benes;
pub mod decomposition;
pub mod extraction;
pub mod sorted;

use crate::error::RouteError;
use crate::header::{HeaderEncoding,HeaderSet};
use crate::permutation::PermutationRequest;
use crate::topology::TopologyParameters;

pub use self::benes::RearrangeableRouting;
pub use self::decomposition::{PermutationDecomposer,SwitchConfig,SwitchConfigTable};
pub use self::extraction::RouteBitExtractor;
pub use self::sorted::SimpleSortRouter;

///What a static routing produces for a request.
#[derive(Clone,Debug)]
pub struct RoutedRequest
{
	pub headers: HeaderSet,
	///The switch settings, for routings that compute them.
	pub table: Option<SwitchConfigTable>,
}

///A static routing computes, once, the headers for a whole request.
pub trait StaticRouting : std::fmt::Debug
{
	fn name(&self) -> &'static str;
	fn route(&self, request:&PermutationRequest, topology:&TopologyParameters) -> Result<RoutedRequest,RouteError>;
}

///Fail unless `request` is over the ports of `topology`.
pub(crate) fn check_ports(request:&PermutationRequest, topology:&TopologyParameters) -> Result<(),RouteError>
{
	if request.ports()!=topology.ports
	{
		return Err(RouteError::UnsupportedTopology(format!("a request over {} ports cannot be routed in a fabric of {} ports",request.ports(),topology.ports)));
	}
	Ok(())
}

///Build a static routing by name. `benes` (also `rearrangeable`) and `sorted` are known.
pub fn new_static_routing(name:&str, encoding:HeaderEncoding) -> Result<Box<dyn StaticRouting>,RouteError>
{
	match name
	{
		"benes" | "rearrangeable" => Ok(Box::new(RearrangeableRouting::new(encoding))),
		"sorted" => Ok(Box::new(SimpleSortRouter)),
		_ => Err(RouteError::UnknownRouting(name.to_string())),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn routings_by_name()
	{
		assert_eq!(new_static_routing("benes",HeaderEncoding::Crossing).unwrap().name(),"benes");
		assert_eq!(new_static_routing("sorted",HeaderEncoding::Crossing).unwrap().name(),"sorted");
		assert!(matches!(new_static_routing("valiant",HeaderEncoding::Crossing),Err(RouteError::UnknownRouting(_))));
	}

	#[test]
	fn request_and_fabric_must_agree()
	{
		let request = PermutationRequest::new(vec![0],vec![1],4).unwrap();
		let topology = TopologyParameters::from_ports(8,4).unwrap();
		assert!(check_ports(&request,&topology).is_err());
		let routing = new_static_routing("benes",HeaderEncoding::Crossing).unwrap();
		assert!(routing.route(&request,&topology).is_err());
	}
}
