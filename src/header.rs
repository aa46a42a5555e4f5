/*!

Route headers: the fixed-length bit sequences read one bit per stage by the switches.

*/

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

///How a header bit is read by the switch that consumes it.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Default)]
pub enum HeaderEncoding
{
	///1 when the switch crosses its inputs, 0 when it lets them straight through.
	#[default]
	Crossing,
	///The output the token leaves the switch by: 0 for the upper one, 1 for the lower one.
	OutputSelect,
}

#[derive(Clone,Debug,PartialEq,Eq,Default)]
pub struct RouteHeader
{
	bits: Vec<bool>,
}

impl RouteHeader
{
	pub fn new() -> RouteHeader
	{
		RouteHeader::default()
	}

	pub fn from_bits(bits:Vec<bool>) -> RouteHeader
	{
		RouteHeader{bits}
	}

	///The `width` lowest bits of `value`, most significant first.
	pub fn from_value(value:u64, width:usize) -> RouteHeader
	{
		let bits = (0..width).rev().map(|position| position<64 && (value>>position)&1==1).collect();
		RouteHeader{bits}
	}

	pub fn push(&mut self, bit:bool)
	{
		self.bits.push(bit);
	}

	pub fn bits(&self) -> &[bool]
	{
		&self.bits
	}

	pub fn len(&self) -> usize
	{
		self.bits.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.bits.is_empty()
	}
}

impl fmt::Display for RouteHeader
{
	fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f,"{}",self.bits.iter().map(|&bit|if bit {'1'} else {'0'}).join(""))
	}
}

///The headers of a routed request, by source port.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct HeaderSet
{
	width: usize,
	headers: BTreeMap<usize,RouteHeader>,
}

impl HeaderSet
{
	pub fn new(width:usize) -> HeaderSet
	{
		HeaderSet{width,headers:BTreeMap::new()}
	}

	///Insert the header of `port`. Every header of a set has the same width.
	pub fn insert(&mut self, port:usize, header:RouteHeader)
	{
		assert_eq!(header.len(),self.width,"header of port {} has {} bits instead of {}",port,header.len(),self.width);
		self.headers.insert(port,header);
	}

	///The bit length shared by every header.
	pub fn width(&self) -> usize
	{
		self.width
	}

	pub fn get(&self, port:usize) -> Option<&RouteHeader>
	{
		self.headers.get(&port)
	}

	pub fn iter(&self) -> impl Iterator<Item=(usize,&RouteHeader)> + '_
	{
		self.headers.iter().map(|(&port,header)|(port,header))
	}

	pub fn len(&self) -> usize
	{
		self.headers.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.headers.is_empty()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn headers_print_as_fixed_width_binary()
	{
		assert_eq!(RouteHeader::from_value(5,6).to_string(),"000101");
		assert_eq!(RouteHeader::from_value(0b1101,3).to_string(),"101");
		assert_eq!(RouteHeader::from_bits(vec![true,false,false]).to_string(),"100");
		assert_eq!(RouteHeader::new().to_string(),"");
	}

	#[test]
	#[should_panic]
	fn sets_refuse_mixed_widths()
	{
		let mut set = HeaderSet::new(3);
		set.insert(0,RouteHeader::from_value(1,3));
		set.insert(1,RouteHeader::from_value(1,4));
	}
}
