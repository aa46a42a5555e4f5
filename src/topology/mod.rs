/*!

Parameters of the switch fabric being routed.

A network description is a Sa-TikZ butterfly document whose first line declares the fabric, as in

```ignore
\node[BP=8, BN=2, BM=2, BL=2, ...] (butterfly) {};
```

* `BP` is the total number of ports, a power of two.
* `BN` is the number of ports of an outer-stage switch, `2^stage_bits`.
* `BM` is the number of ports of a middle-stage switch, `2^middle_bits`.
* `BL` is the number of outer stages at each side of the middle stage.

The rest of the document is a diagram body that is never interpreted; it is only echoed back when annotating.

*/

pub mod wiring;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::RouteError;

///Integer log2 of a power of two; `None` otherwise.
pub fn exact_log2(value:usize) -> Option<usize>
{
	if value.is_power_of_two() { Some(value.trailing_zeros() as usize) } else { None }
}

///The four integers describing a fabric. Immutable for a run.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct TopologyParameters
{
	///Total number of ports, `N`.
	pub ports: usize,
	///Address bits consumed by each outer stage.
	pub stage_bits: usize,
	///Address bits consumed by the middle stage.
	pub middle_bits: usize,
	///Outer stages at each side of the middle stage.
	pub stages: usize,
}

impl TopologyParameters
{
	pub fn new(ports:usize, stage_bits:usize, middle_bits:usize, stages:usize) -> Result<TopologyParameters,RouteError>
	{
		if exact_log2(ports).is_none()
		{
			return Err(RouteError::MalformedTopology(format!("the port count {} is not a power of two",ports)));
		}
		Ok(TopologyParameters{ports,stage_bits,middle_bits,stages})
	}

	///Decode the declaration line of a network description.
	pub fn parse_declaration(line:&str) -> Result<TopologyParameters,RouteError>
	{
		let malformed = |reason:&str| RouteError::MalformedTopology(format!("{} in '{}'",reason,line.trim()));
		let body = line.trim().strip_prefix("\\node[").ok_or_else(||malformed("missing \\node[ prefix"))?;
		let body = match body.find(']')
		{
			Some(end) => &body[..end],
			None => body,
		};
		let mut ports = None;
		let mut switch_size = None;
		let mut middle_size = None;
		let mut stages = None;
		for item in body.split(',')
		{
			let (key,value) = match item.split_once('=')
			{
				Some(pair) => pair,
				None => continue,
			};
			let slot = match key.trim()
			{
				"BP" => &mut ports,
				"BN" => &mut switch_size,
				"BM" => &mut middle_size,
				"BL" => &mut stages,
				_ => continue,
			};
			let digits:String = value.trim().chars().take_while(|c|c.is_ascii_digit()).collect();
			let number = digits.parse::<usize>().map_err(|_|malformed(&format!("bad value for {}",key.trim())))?;
			*slot = Some(number);
		}
		let ports = ports.ok_or_else(||malformed("missing BP"))?;
		let switch_size = switch_size.ok_or_else(||malformed("missing BN"))?;
		let middle_size = middle_size.ok_or_else(||malformed("missing BM"))?;
		let stages = stages.ok_or_else(||malformed("missing BL"))?;
		let stage_bits = exact_log2(switch_size).ok_or_else(||malformed("BN is not a power of two"))?;
		let middle_bits = exact_log2(middle_size).ok_or_else(||malformed("BM is not a power of two"))?;
		TopologyParameters::new(ports,stage_bits,middle_bits,stages)
	}

	///Build the parameters of a fabric of 2x2 outer switches from its port count and the number of middle-stage switches.
	pub fn from_ports(ports:usize, middle_switches:usize) -> Result<TopologyParameters,RouteError>
	{
		let port_bits = exact_log2(ports).ok_or_else(||RouteError::MalformedTopology(format!("the port count {} is not a power of two",ports)))?;
		if middle_switches==0 || ports % middle_switches != 0
		{
			return Err(RouteError::MalformedTopology(format!("{} middle switches cannot split {} ports",middle_switches,ports)));
		}
		let middle_bits = exact_log2(ports/middle_switches).ok_or_else(||RouteError::MalformedTopology(format!("middle switches of {} ports are not a power of two",ports/middle_switches)))?;
		TopologyParameters::new(ports,1,middle_bits,port_bits-middle_bits)
	}

	///`log2(N)`.
	pub fn port_bits(&self) -> usize
	{
		self.ports.trailing_zeros() as usize
	}

	pub fn num_switches(&self) -> usize
	{
		self.ports/2
	}

	///Length of every route header of this fabric.
	pub fn header_bits(&self) -> usize
	{
		2*self.stages*self.stage_bits + self.middle_bits
	}

	///Whether the fabric is a Beneš network of 2x2 elements, the only shape the looping router handles.
	pub fn is_binary_benes(&self) -> bool
	{
		let k = self.port_bits();
		if k==0
		{
			return self.stages==0 && self.middle_bits==0;
		}
		self.stage_bits==1 && self.middle_bits==1 && self.stages==k-1
	}
}

///A parsed network description: its parameters and the whole document, kept for annotation.
#[derive(Clone,Debug)]
pub struct NetworkDescription
{
	pub parameters: TopologyParameters,
	pub body: String,
}

impl NetworkDescription
{
	pub fn parse(text:&str) -> Result<NetworkDescription,RouteError>
	{
		let line = text.lines().next().ok_or_else(||RouteError::MalformedTopology("empty network description".to_string()))?;
		let parameters = TopologyParameters::parse_declaration(line)?;
		debug!(?parameters,"parsed network declaration");
		Ok(NetworkDescription{
			parameters,
			body: text.to_string(),
		})
	}

	pub fn from_file<P:AsRef<Path>>(path:P) -> Result<NetworkDescription,RouteError>
	{
		let text = fs::read_to_string(path)?;
		NetworkDescription::parse(&text)
	}
}
