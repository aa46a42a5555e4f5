/*!

Route requests: the `src--dst` pairs a static routing must honour.

A [PermutationRequest] can only be built through validation, so every request in the program has pairwise distinct sources, pairwise distinct destinations and every id inside `[0,N)`. The routers rely on it and do not check again.

*/

use std::collections::BTreeSet;

use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::error::{Endpoint,RouteError};

///A single `(source,destination)` pair.
///When the entry belongs to a sub-permutation obtained by halving ids, `physical` keeps the ports of the full fabric it came from.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct PermutationEntry
{
	pub source: usize,
	pub destination: usize,
	pub physical: Option<(usize,usize)>,
}

impl PermutationEntry
{
	pub fn new(source:usize, destination:usize) -> PermutationEntry
	{
		PermutationEntry{source,destination,physical:None}
	}

	///The entry one recursion level down, where each pair of ports collapses into its switch.
	pub fn halved(&self) -> PermutationEntry
	{
		PermutationEntry{
			source: self.source/2,
			destination: self.destination/2,
			physical: Some(self.physical_ports()),
		}
	}

	///The fabric ports this entry stands for.
	pub fn physical_ports(&self) -> (usize,usize)
	{
		self.physical.unwrap_or((self.source,self.destination))
	}
}

///Parse a port id the way it is accepted on the command line: decimal, or `0x`, `0o` or `0b` prefixed, optionally negative.
pub fn parse_id(text:&str) -> Option<i64>
{
	let text = text.trim();
	let (negative,digits) = match text.strip_prefix('-')
	{
		Some(rest) => (true,rest),
		None => (false,text),
	};
	let lower = digits.to_ascii_lowercase();
	let value = if let Some(hex) = lower.strip_prefix("0x") {
		i64::from_str_radix(hex,16).ok()?
	} else if let Some(octal) = lower.strip_prefix("0o") {
		i64::from_str_radix(octal,8).ok()?
	} else if let Some(binary) = lower.strip_prefix("0b") {
		i64::from_str_radix(binary,2).ok()?
	} else {
		lower.parse::<i64>().ok()?
	};
	Some(if negative { -value } else { value })
}

fn check_duplicates(ids:&[i64], side:Endpoint) -> Result<(),RouteError>
{
	let repeated:Vec<i64> = ids.iter().duplicates().copied().sorted().collect();
	if repeated.is_empty() { Ok(()) } else { Err(RouteError::DuplicateId{side,ids:repeated}) }
}

fn check_range(ids:&[i64], side:Endpoint, ports:usize) -> Result<(),RouteError>
{
	if let Some(&max) = ids.iter().max()
	{
		if max >= ports as i64
		{
			return Err(RouteError::OutOfRangeId{side,id:max,ports});
		}
	}
	if let Some(&min) = ids.iter().min()
	{
		if min < 0
		{
			return Err(RouteError::OutOfRangeId{side,id:min,ports});
		}
	}
	Ok(())
}

///A validated set of `(source,destination)` pairs over a fabric of `ports` ports. It may hold fewer than `ports` pairs.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct PermutationRequest
{
	ports: usize,
	sources: Vec<usize>,
	destinations: Vec<usize>,
}

impl PermutationRequest
{
	///Check the request invariants without building anything.
	///Repetitions are reported before ranges, sources before destinations.
	pub fn validate(sources:&[i64], destinations:&[i64], ports:usize) -> Result<(),RouteError>
	{
		if sources.len()!=destinations.len()
		{
			return Err(RouteError::LengthMismatch{sources:sources.len(),destinations:destinations.len()});
		}
		check_duplicates(sources,Endpoint::Source)?;
		check_duplicates(destinations,Endpoint::Destination)?;
		check_range(sources,Endpoint::Source,ports)?;
		check_range(destinations,Endpoint::Destination,ports)?;
		Ok(())
	}

	pub fn new(sources:Vec<i64>, destinations:Vec<i64>, ports:usize) -> Result<PermutationRequest,RouteError>
	{
		PermutationRequest::validate(&sources,&destinations,ports)?;
		Ok(PermutationRequest{
			ports,
			sources: sources.into_iter().map(|id|id as usize).collect(),
			destinations: destinations.into_iter().map(|id|id as usize).collect(),
		})
	}

	pub fn from_pairs<I:IntoIterator<Item=(i64,i64)>>(pairs:I, ports:usize) -> Result<PermutationRequest,RouteError>
	{
		let (sources,destinations) = pairs.into_iter().unzip();
		PermutationRequest::new(sources,destinations,ports)
	}

	///Build a request from `src--dst` tokens.
	pub fn parse<S:AsRef<str>>(tokens:&[S], ports:usize) -> Result<PermutationRequest,RouteError>
	{
		let mut pairs = Vec::with_capacity(tokens.len());
		for token in tokens
		{
			let token = token.as_ref();
			let malformed = || RouteError::MalformedRequest(token.to_string());
			let (source,destination) = token.split_once("--").ok_or_else(malformed)?;
			pairs.push((parse_id(source).ok_or_else(malformed)?,parse_id(destination).ok_or_else(malformed)?));
		}
		PermutationRequest::from_pairs(pairs,ports)
	}

	///Sources and destinations are two independent uniformly random permutations of the ports.
	pub fn random<R:Rng+?Sized>(ports:usize, rng:&mut R) -> PermutationRequest
	{
		info!(ports,"no route given, generating a random route");
		let mut sources:Vec<usize> = (0..ports).collect();
		let mut destinations:Vec<usize> = (0..ports).collect();
		sources.shuffle(rng);
		destinations.shuffle(rng);
		PermutationRequest{ports,sources,destinations}
	}

	pub fn ports(&self) -> usize
	{
		self.ports
	}

	pub fn sources(&self) -> &[usize]
	{
		&self.sources
	}

	pub fn destinations(&self) -> &[usize]
	{
		&self.destinations
	}

	pub fn len(&self) -> usize
	{
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.sources.is_empty()
	}

	///Whether every port appears as a source (and hence as a destination).
	pub fn is_complete(&self) -> bool
	{
		self.len()==self.ports
	}

	pub fn pairs(&self) -> impl Iterator<Item=(usize,usize)> + '_
	{
		self.sources.iter().copied().zip(self.destinations.iter().copied())
	}

	pub fn entries(&self) -> Vec<PermutationEntry>
	{
		self.pairs().map(|(source,destination)|PermutationEntry::new(source,destination)).collect()
	}

	pub fn destination_of(&self, source:usize) -> Option<usize>
	{
		self.pairs().find(|&(s,_)|s==source).map(|(_,d)|d)
	}

	///The request extended to a full permutation. Unused sources are paired, in ascending order, with unused destinations in ascending order.
	pub fn completed(&self) -> PermutationRequest
	{
		let used_sources:BTreeSet<usize> = self.sources.iter().copied().collect();
		let used_destinations:BTreeSet<usize> = self.destinations.iter().copied().collect();
		let free_sources = (0..self.ports).filter(|p|!used_sources.contains(p));
		let free_destinations = (0..self.ports).filter(|p|!used_destinations.contains(p));
		let mut request = self.clone();
		for (source,destination) in free_sources.zip(free_destinations)
		{
			request.sources.push(source);
			request.destinations.push(destination);
		}
		request
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn duplicates_are_named()
	{
		match PermutationRequest::validate(&[0,0,1,2],&[0,1,2,3],4)
		{
			Err(RouteError::DuplicateId{side:Endpoint::Source,ids}) => assert_eq!(ids,vec![0]),
			other => panic!("unexpected {:?}",other),
		}
		match PermutationRequest::validate(&[0,1,2,3,4,5],&[5,3,5,3,3,0],8)
		{
			Err(RouteError::DuplicateId{side:Endpoint::Destination,ids}) => assert_eq!(ids,vec![3,5]),
			other => panic!("unexpected {:?}",other),
		}
	}

	#[test]
	fn ids_must_be_in_range()
	{
		match PermutationRequest::validate(&[0,1,2],&[9,1,2],8)
		{
			Err(RouteError::OutOfRangeId{side:Endpoint::Destination,id,ports}) => assert_eq!((id,ports),(9,8)),
			other => panic!("unexpected {:?}",other),
		}
		match PermutationRequest::validate(&[-1,1],&[0,1],8)
		{
			Err(RouteError::OutOfRangeId{side:Endpoint::Source,id:-1,..}) => (),
			other => panic!("unexpected {:?}",other),
		}
		assert!(PermutationRequest::validate(&[0,7],&[7,0],8).is_ok());
		assert!(matches!(PermutationRequest::validate(&[0],&[],8),Err(RouteError::LengthMismatch{..})));
	}

	#[test]
	fn parse_tokens()
	{
		let request = PermutationRequest::parse(&["0--3","0x1--0b10","2--0o1","3--0"],4).unwrap();
		assert_eq!(request.sources(),&[0,1,2,3]);
		assert_eq!(request.destinations(),&[3,2,1,0]);
		assert_eq!(request.destination_of(1),Some(2));
		assert!(matches!(PermutationRequest::parse(&["1-2"],4),Err(RouteError::MalformedRequest(_))));
		assert!(matches!(PermutationRequest::parse(&["a--2"],4),Err(RouteError::MalformedRequest(_))));
		assert!(matches!(PermutationRequest::parse(&["-1--2"],4),Err(RouteError::OutOfRangeId{id:-1,..})));
	}

	#[test]
	fn completion_fills_free_ports_in_order()
	{
		let request = PermutationRequest::parse(&["5--0","2--6"],8).unwrap();
		assert!(!request.is_complete());
		let full = request.completed();
		assert!(full.is_complete());
		let pairs:Vec<(usize,usize)> = full.pairs().collect();
		assert_eq!(pairs,vec![(5,0),(2,6),(0,1),(1,2),(3,3),(4,4),(6,5),(7,7)]);
		assert!(PermutationRequest::validate(
			&full.sources().iter().map(|&p|p as i64).collect::<Vec<_>>(),
			&full.destinations().iter().map(|&p|p as i64).collect::<Vec<_>>(),
			8).is_ok());
	}

	#[test]
	fn random_requests_are_permutations()
	{
		let mut rng = StdRng::seed_from_u64(7);
		for ports in [1,2,16,64]
		{
			let request = PermutationRequest::random(ports,&mut rng);
			assert!(request.is_complete());
			let sources:BTreeSet<usize> = request.sources().iter().copied().collect();
			let destinations:BTreeSet<usize> = request.destinations().iter().copied().collect();
			assert_eq!(sources,(0..ports).collect::<BTreeSet<usize>>());
			assert_eq!(destinations,(0..ports).collect::<BTreeSet<usize>>());
		}
	}

	#[test]
	fn halving_keeps_physical_ports()
	{
		let entry = PermutationEntry::new(5,2);
		let half = entry.halved();
		assert_eq!((half.source,half.destination),(2,1));
		assert_eq!(half.physical_ports(),(5,2));
		let quarter = half.halved();
		assert_eq!((quarter.source,quarter.destination),(1,0));
		assert_eq!(quarter.physical_ports(),(5,2));
	}
}
