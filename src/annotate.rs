/*!

Annotated diagrams: a standalone TikZ document drawing the setting of every switch over the input network diagram.

Switch nodes are expected to be named as the Sa-TikZ butterfly library names them, `r<stage>-<switch>-input-<i>` and `r<stage>-<switch>-output-<o>`, all 1-based.

*/

use std::fs::File;
use std::io::{BufWriter,Write};
use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::error::RouteError;
use crate::routing::decomposition::SwitchConfigTable;
use crate::topology::wiring::StagePlan;

const PREAMBLE: &str = r"\documentclass[tikz]{standalone}
\usepackage{xcolor}
\usetikzlibrary{switching-architectures}
\pagestyle{empty}

\begin{document}

\begin{tikzpicture}
";

const CLOSING: &str = r"
\end{tikzpicture}

\end{document}
";

fn connector<W:Write>(out:&mut W, stage:usize, switch:usize, input:usize, output:usize) -> std::io::Result<()>
{
	write!(out,"\n\\draw[color=blue,densely dotted,thick](r{s}-{w}-input-{i})--(r{s}-{w}-output-{o});",s=stage,w=switch,i=input,o=output)
}

///Write the document: preamble, the network `body` verbatim, then two connectors per switch, straight or crossed.
pub fn write_annotation<W:Write>(out:&mut W, body:&str, plan:&StagePlan, table:&SwitchConfigTable) -> std::io::Result<()>
{
	writeln!(out,"% Switch settings generated on {}",Local::now().format("%Y-%m-%d %H:%M:%S"))?;
	out.write_all(PREAMBLE.as_bytes())?;
	out.write_all(body.as_bytes())?;
	for stage in plan.stages()
	{
		for switch in 0..plan.ports()/2
		{
			let crossing = table.crosses(stage,2*switch);
			let (upper,lower) = if crossing { (2,1) } else { (1,2) };
			connector(out,stage.index+1,switch+1,1,upper)?;
			connector(out,stage.index+1,switch+1,2,lower)?;
		}
	}
	out.write_all(CLOSING.as_bytes())?;
	Ok(())
}

pub fn annotate_file<P:AsRef<Path>>(path:P, body:&str, plan:&StagePlan, table:&SwitchConfigTable) -> Result<(),RouteError>
{
	let path = path.as_ref();
	let mut out = BufWriter::new(File::create(path)?);
	write_annotation(&mut out,body,plan,table)?;
	out.flush()?;
	info!(path=%path.display(),"annotated diagram written");
	Ok(())
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::permutation::PermutationRequest;
	use crate::routing::decomposition::PermutationDecomposer;

	#[test]
	fn crossed_switches_draw_crossed_connectors()
	{
		let request = PermutationRequest::new(vec![0,1],vec![1,0],2).unwrap();
		let table = PermutationDecomposer::decompose(&request);
		let mut out = Vec::new();
		write_annotation(&mut out,"% body\n",&StagePlan::new(2),&table).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert!(text.contains("% body\n"));
		assert!(text.contains("(r1-1-input-1)--(r1-1-output-2)"));
		assert!(text.contains("(r1-1-input-2)--(r1-1-output-1)"));
		assert!(text.trim_end().ends_with("\\end{document}"));
	}

	#[test]
	fn one_pair_of_connectors_per_switch_and_stage()
	{
		let request = PermutationRequest::new((0..8).collect(),(0..8).collect(),8).unwrap();
		let table = PermutationDecomposer::decompose(&request);
		let mut out = Vec::new();
		write_annotation(&mut out,"",&StagePlan::new(8),&table).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert_eq!(text.matches("\\draw").count(),5*4*2);
		assert!(text.contains("(r5-4-input-2)--(r5-4-output-2)"));
	}
}
