//! VML equations (`v:formulas`) translated to ODF `draw:equation` formulas.
//!
//! VML writes equations in prefix form, `op a b c`, where operands are
//! numbers, adjustment references (`#N`), earlier results (`@N`) or named
//! shape values. ODF uses infix formulas with `$N` and `?fN` references, so
//! `sum #0 0 10800` becomes `$0+0-10800`.
//!
//! Trigonometric operations take angles in fixed degrees (1/65536°); the
//! conversion to radians is folded into the emitted formula.

use std::fmt;

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::defaults::FIXED_DEGREES;
use crate::errors::FormulaError;
use crate::log::warn;
use crate::types::fmt_num;

#[derive(Parser)]
#[grammar = "vml/formula.pest"]
struct EquationParser;

/// Fixed degrees in half a turn.
const FD_HALF_TURN: u32 = 180 * FIXED_DEGREES;

/// A VML equation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Val,
    Sum,
    Product,
    Mid,
    Abs,
    Min,
    Max,
    If,
    Mod,
    Atan2,
    Sin,
    Cos,
    Tan,
    CosAtan2,
    SinAtan2,
    Sqrt,
    SumAngle,
    Ellipse,
}

impl Operation {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "val" => Operation::Val,
            "sum" => Operation::Sum,
            "prod" | "product" => Operation::Product,
            "mid" => Operation::Mid,
            "abs" => Operation::Abs,
            "min" => Operation::Min,
            "max" => Operation::Max,
            "if" => Operation::If,
            "mod" => Operation::Mod,
            "atan2" => Operation::Atan2,
            "sin" => Operation::Sin,
            "cos" => Operation::Cos,
            "tan" => Operation::Tan,
            "cosatan2" => Operation::CosAtan2,
            "sinatan2" => Operation::SinAtan2,
            "sqrt" => Operation::Sqrt,
            "sumangle" => Operation::SumAngle,
            "ellipse" => Operation::Ellipse,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Val => "val",
            Operation::Sum => "sum",
            Operation::Product => "prod",
            Operation::Mid => "mid",
            Operation::Abs => "abs",
            Operation::Min => "min",
            Operation::Max => "max",
            Operation::If => "if",
            Operation::Mod => "mod",
            Operation::Atan2 => "atan2",
            Operation::Sin => "sin",
            Operation::Cos => "cos",
            Operation::Tan => "tan",
            Operation::CosAtan2 => "cosatan2",
            Operation::SinAtan2 => "sinatan2",
            Operation::Sqrt => "sqrt",
            Operation::SumAngle => "sumangle",
            Operation::Ellipse => "ellipse",
        }
    }

    /// Number of operands the operation reads.
    pub fn arity(self) -> usize {
        match self {
            Operation::Val | Operation::Abs | Operation::Sqrt => 1,
            Operation::Mid
            | Operation::Min
            | Operation::Max
            | Operation::Atan2
            | Operation::Sin
            | Operation::Cos
            | Operation::Tan => 2,
            Operation::Sum
            | Operation::Product
            | Operation::If
            | Operation::Mod
            | Operation::CosAtan2
            | Operation::SinAtan2
            | Operation::SumAngle
            | Operation::Ellipse => 3,
        }
    }
}

/// An equation operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Number(f64),
    /// `#N`
    Adjust(u32),
    /// `@N`
    Formula(u32),
    /// A named shape value, already mapped to its ODF expression
    Named(&'static str),
}

impl Operand {
    /// The operand as a term inside an arithmetic expression.
    fn grouped(&self) -> String {
        match self {
            Operand::Number(v) if *v < 0.0 => format!("({})", self),
            Operand::Named(expr) if !expr.chars().all(|c| c.is_ascii_alphanumeric()) => {
                format!("({})", expr)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(v) => f.write_str(&fmt_num(*v)),
            Operand::Adjust(n) => write!(f, "${}", n),
            Operand::Formula(n) => write!(f, "?f{}", n),
            Operand::Named(expr) => f.write_str(expr),
        }
    }
}

/// Map a named VML value to the equivalent ODF expression.
fn named_operand(name: &str) -> Option<&'static str> {
    Some(match name {
        "width" => "logwidth",
        "height" => "logheight",
        "xcenter" => "(left+right)/2",
        "ycenter" => "(top+bottom)/2",
        "pixelwidth" | "emuwidth" => "width",
        "pixelheight" | "emuheight" => "height",
        "emuwidth2" => "width/2",
        "emuheight2" => "height/2",
        "pixellinewidth" => "1",
        "hasfill" => "hasfill",
        "hasstroke" | "linedrawn" => "hasstroke",
        "xlimo" | "ylimo" => {
            warn!(name, "limo values are not representable, using 0");
            "0"
        }
        _ => return None,
    })
}

/// A parsed VML equation.
#[derive(Debug, Clone, PartialEq)]
pub struct VmlEquation {
    pub operation: Operation,
    /// Exactly `operation.arity()` operands; missing ones read as 0
    pub operands: Vec<Operand>,
}

impl VmlEquation {
    /// The ODF formula text.
    pub fn to_odf(&self) -> String {
        let arg = |i: usize| self.operands.get(i).copied().unwrap_or(Operand::Number(0.0));
        let (a, b, c) = (arg(0), arg(1), arg(2));
        let (ga, gb, gc) = (a.grouped(), b.grouped(), c.grouped());
        match self.operation {
            Operation::Val => a.to_string(),
            Operation::Sum => format!("{ga}+{gb}-{gc}"),
            Operation::Product => format!("{ga}*{gb}/{gc}"),
            Operation::Mid => format!("({ga}+{gb})/2"),
            Operation::Abs => format!("abs({a})"),
            Operation::Min => format!("min({a},{b})"),
            Operation::Max => format!("max({a},{b})"),
            Operation::If => format!("if({a},{b},{c})"),
            Operation::Mod => format!("sqrt({ga}*{ga}+{gb}*{gb}+{gc}*{gc})"),
            Operation::Atan2 => format!("atan2({b},{a})*{FD_HALF_TURN}/pi"),
            Operation::Sin => format!("{ga}*sin({gb}*pi/{FD_HALF_TURN})"),
            Operation::Cos => format!("{ga}*cos({gb}*pi/{FD_HALF_TURN})"),
            Operation::Tan => format!("{ga}*tan({gb}*pi/{FD_HALF_TURN})"),
            Operation::CosAtan2 => format!("{ga}*cos(atan2({c},{b}))"),
            Operation::SinAtan2 => format!("{ga}*sin(atan2({c},{b}))"),
            Operation::Sqrt => format!("sqrt({a})"),
            Operation::SumAngle => format!("{ga}+{gb}*{FIXED_DEGREES}-{gc}*{FIXED_DEGREES}"),
            Operation::Ellipse => format!("{gc}*sqrt(1-({ga}/{gb})*({ga}/{gb}))"),
        }
    }
}

fn source(eqn: &str) -> NamedSource<String> {
    NamedSource::new("eqn", eqn.to_string())
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

fn reference_index(pair: &Pair<'_, Rule>) -> u32 {
    pair.as_str()[1..].parse().unwrap_or(u32::MAX)
}

/// Parse a VML equation.
pub fn parse_equation(eqn: &str) -> Result<VmlEquation, FormulaError> {
    let mut pairs = EquationParser::parse(Rule::formula, eqn).map_err(|e| {
        let (offset, len) = match e.location {
            InputLocation::Pos(pos) => (pos, 0),
            InputLocation::Span((start, end)) => (start, end - start),
        };
        FormulaError::Syntax {
            message: e.variant.message().into_owned(),
            src: source(eqn),
            span: (offset, len).into(),
        }
    })?;

    let Some(formula) = pairs.next() else {
        return Err(FormulaError::Syntax {
            message: "empty equation".to_string(),
            src: source(eqn),
            span: (0, eqn.len()).into(),
        });
    };

    let mut inner = formula.into_inner();
    let Some(op) = inner.next().filter(|p| p.as_rule() == Rule::op) else {
        return Err(FormulaError::Syntax {
            message: "expected an operation".to_string(),
            src: source(eqn),
            span: (0, eqn.len()).into(),
        });
    };
    let operation = Operation::from_name(op.as_str()).ok_or_else(|| FormulaError::UnknownOperation {
        name: op.as_str().to_string(),
        src: source(eqn),
        span: span_of(&op),
    })?;

    let mut operands = Vec::with_capacity(3);
    let mut args_span: Option<(usize, usize)> = None;
    for arg in inner {
        let operand = match arg.as_rule() {
            Rule::number => Operand::Number(arg.as_str().parse().map_err(|_| FormulaError::Syntax {
                message: format!("invalid number `{}`", arg.as_str()),
                src: source(eqn),
                span: span_of(&arg),
            })?),
            Rule::adjust => Operand::Adjust(reference_index(&arg)),
            Rule::formula_ref => Operand::Formula(reference_index(&arg)),
            Rule::ident => {
                let name = arg.as_str();
                Operand::Named(named_operand(name).ok_or_else(|| FormulaError::UnknownOperand {
                    name: name.to_string(),
                    src: source(eqn),
                    span: span_of(&arg),
                })?)
            }
            _ => continue,
        };
        let span = arg.as_span();
        args_span = Some(match args_span {
            Some((start, _)) => (start, span.end()),
            None => (span.start(), span.end()),
        });
        operands.push(operand);
    }

    let expected = operation.arity();
    if operands.len() > expected {
        let (start, end) = args_span.unwrap_or((0, eqn.len()));
        return Err(FormulaError::Arity {
            op: operation.name(),
            expected,
            got: operands.len(),
            src: source(eqn),
            span: (start, end - start).into(),
        });
    }
    operands.resize(expected, Operand::Number(0.0));

    Ok(VmlEquation { operation, operands })
}

/// Translate a VML equation to ODF formula text.
pub fn translate(eqn: &str) -> Result<String, FormulaError> {
    Ok(parse_equation(eqn)?.to_odf())
}

/// A named ODF equation (`draw:equation`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    /// `f0`, `f1`, … matching the `?fN` references
    pub name: String,
    pub formula: String,
}

/// Translate a list of VML equations, keeping their positions.
///
/// An equation that fails to translate is logged and replaced by `0` so
/// that later `@N` references still line up.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn translate_all<'s>(eqns: impl IntoIterator<Item = &'s str>) -> Vec<Equation> {
    eqns.into_iter()
        .enumerate()
        .map(|(i, eqn)| {
            let formula = translate(eqn).unwrap_or_else(|err| {
                warn!(index = i, eqn, error = %err, "untranslatable VML equation, using 0");
                "0".to_string()
            });
            Equation {
                name: format!("f{}", i),
                formula,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn odf(eqn: &str) -> String {
        match translate(eqn) {
            Ok(s) => s,
            Err(e) => panic!("{eqn}: {e}"),
        }
    }

    #[test]
    fn arithmetic() {
        assert_eq!(odf("val #0"), "$0");
        assert_eq!(odf("sum #0 0 10800"), "$0+0-10800");
        assert_eq!(odf("prod @1 2 3"), "?f1*2/3");
        assert_eq!(odf("product 21600 #0 10800"), "21600*$0/10800");
        assert_eq!(odf("mid #0 #1"), "($0+$1)/2");
        assert_eq!(odf("if #0 1 2"), "if($0,1,2)");
    }

    #[test]
    fn negative_numbers_are_grouped() {
        assert_eq!(odf("sum 0 -5 0"), "0+(-5)-0");
        assert_eq!(odf("val -5"), "-5");
    }

    #[test]
    fn named_values() {
        assert_eq!(odf("val width"), "logwidth");
        assert_eq!(odf("prod height 1 2"), "logheight*1/2");
        assert_eq!(odf("mid xcenter #1"), "(((left+right)/2)+$1)/2");
        assert_eq!(odf("val linedrawn"), "hasstroke");
        assert_eq!(odf("val xlimo"), "0");
        assert_eq!(odf("val emuwidth2"), "width/2");
    }

    #[test]
    fn trigonometry_converts_fixed_degrees() {
        assert_eq!(odf("sin 10 #0"), "10*sin($0*pi/11796480)");
        assert_eq!(odf("atan2 @0 @1"), "atan2(?f1,?f0)*11796480/pi");
        assert_eq!(odf("cosatan2 #0 @1 @2"), "$0*cos(atan2(?f2,?f1))");
        assert_eq!(odf("sumangle #0 90 0"), "$0+90*65536-0*65536");
    }

    #[test]
    fn geometry_helpers() {
        assert_eq!(odf("mod #0 #1 0"), "sqrt($0*$0+$1*$1+0*0)");
        assert_eq!(odf("ellipse #0 10800 10800"), "10800*sqrt(1-($0/10800)*($0/10800))");
        assert_eq!(odf("sqrt @3"), "sqrt(?f3)");
    }

    #[test]
    fn commas_and_missing_operands() {
        assert_eq!(odf("sum #0,0,10800"), "$0+0-10800");
        assert_eq!(odf("sum #0"), "$0+0-0");
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_equation("frob 1 2"),
            Err(FormulaError::UnknownOperation { ref name, .. }) if name == "frob"
        ));
        assert!(matches!(
            parse_equation("val banana"),
            Err(FormulaError::UnknownOperand { ref name, .. }) if name == "banana"
        ));
        assert!(matches!(
            parse_equation("val 1 2"),
            Err(FormulaError::Arity { op: "val", expected: 1, got: 2, .. })
        ));
        assert!(matches!(parse_equation(""), Err(FormulaError::Syntax { .. })));
        assert!(matches!(parse_equation("sum #x"), Err(FormulaError::Syntax { .. })));
    }

    #[test]
    fn failed_equations_keep_their_slot() {
        let eqns = translate_all(["val #0", "bogus", "sum @0 @1 0"]);
        let formulas: Vec<_> = eqns.iter().map(|e| (e.name.as_str(), e.formula.as_str())).collect();
        assert_eq!(formulas, vec![("f0", "$0"), ("f1", "0"), ("f2", "?f0+?f1-0")]);
    }
}
