//! Expression serialization: a variable side-table plus a preorder,
//! tag-dispatched body (component I).

use std::collections::{BTreeMap, HashMap};

use crate::bytestring::{decode_bytestring, encode_bytestring};
use crate::error::{KernelError, Result};
use crate::expr::{Expr, Variable};
use crate::numeric::NumericValue;

const TAG_CONSTANT: u8 = 1;
const TAG_VARIABLE: u8 = 2;
const TAG_PLUS: u8 = 3;
const TAG_MINUS: u8 = 4;
const TAG_NEG: u8 = 5;
const TAG_TIMES: u8 = 6;
const TAG_DIVIDE: u8 = 7;
const TAG_MODULO: u8 = 8;
const TAG_POWER: u8 = 9;
const TAG_EXP: u8 = 10;
const TAG_LOG: u8 = 11;
const TAG_COS: u8 = 12;
const TAG_SIN: u8 = 13;
const TAG_ABS: u8 = 14;
const TAG_SIGN: u8 = 15;

/// Encode `expr` to its wire format. Fails if the tree contains a wildcard
/// or carries more than 65535 distinct variables.
pub fn serialize(expr: &Expr) -> Result<Vec<u8>> {
    let mut collected = Vec::new();
    collect_variables(expr, &mut collected)?;

    // Later occurrences win: mirrors the original's plain dict assignment
    // (`alias_lookup[term.identity] = term.print_alias`) during the scan.
    let mut by_identity: BTreeMap<Vec<u8>, Option<String>> = BTreeMap::new();
    for (identity, alias) in collected {
        by_identity.insert(identity, alias);
    }
    if by_identity.len() > u16::MAX as usize {
        return Err(KernelError::Encode(
            "too many distinct variables to encode".into(),
        ));
    }

    let index: HashMap<&[u8], u16> = by_identity
        .keys()
        .enumerate()
        .map(|(i, id)| (id.as_slice(), i as u16))
        .collect();

    let mut out = Vec::new();
    out.extend_from_slice(&(by_identity.len() as u16).to_be_bytes());
    for (identity, alias) in &by_identity {
        out.extend(encode_bytestring(identity)?);
        out.extend(encode_bytestring(alias.as_deref().unwrap_or("").as_bytes())?);
    }
    encode_body(expr, &index, &mut out)?;
    Ok(out)
}

fn collect_variables(expr: &Expr, out: &mut Vec<(Vec<u8>, Option<String>)>) -> Result<()> {
    match expr {
        Expr::Variable(v) => {
            out.push((v.identity.clone(), v.alias.clone()));
            Ok(())
        }
        Expr::Wildcard(_) => Err(KernelError::Encode(
            "cannot encode a tree containing a wildcard".into(),
        )),
        _ => {
            for term in expr.terms() {
                collect_variables(term, out)?;
            }
            Ok(())
        }
    }
}

fn encode_body(expr: &Expr, index: &HashMap<&[u8], u16>, out: &mut Vec<u8>) -> Result<()> {
    macro_rules! binary {
        ($tag:expr, $a:expr, $b:expr) => {{
            out.push($tag);
            encode_body($a, index, out)?;
            encode_body($b, index, out)?;
        }};
    }
    macro_rules! unary {
        ($tag:expr, $a:expr) => {{
            out.push($tag);
            encode_body($a, index, out)?;
        }};
    }

    match expr {
        Expr::Constant(value) => {
            out.push(TAG_CONSTANT);
            out.extend(value.encode()?);
        }
        Expr::Variable(v) => {
            out.push(TAG_VARIABLE);
            let idx = index[v.identity.as_slice()];
            out.extend_from_slice(&idx.to_be_bytes());
        }
        Expr::Wildcard(_) => {
            return Err(KernelError::Encode(
                "cannot encode a tree containing a wildcard".into(),
            ))
        }
        Expr::Plus(a, b) => binary!(TAG_PLUS, a, b),
        Expr::Minus(a, b) => binary!(TAG_MINUS, a, b),
        Expr::Times(a, b) => binary!(TAG_TIMES, a, b),
        Expr::Divide(a, b) => binary!(TAG_DIVIDE, a, b),
        Expr::Modulo(a, b) => binary!(TAG_MODULO, a, b),
        Expr::Power(a, b) => binary!(TAG_POWER, a, b),
        Expr::Neg(a) => unary!(TAG_NEG, a),
        Expr::Exp(a) => unary!(TAG_EXP, a),
        Expr::Log(a) => unary!(TAG_LOG, a),
        Expr::Cos(a) => unary!(TAG_COS, a),
        Expr::Sin(a) => unary!(TAG_SIN, a),
        Expr::Abs(a) => unary!(TAG_ABS, a),
        Expr::Sign(a) => unary!(TAG_SIGN, a),
    }
    Ok(())
}

/// Decode a wire-format expression. Any trailing bytes beyond the encoded
/// body are ignored.
pub fn deserialize(data: &[u8]) -> Result<Expr> {
    if data.len() < 2 {
        return Err(KernelError::Decode("truncated variable table count".into()));
    }
    let count = u16::from_be_bytes(data[0..2].try_into().unwrap()) as usize;
    let mut pos = 2;
    let mut table = Vec::with_capacity(count);
    for _ in 0..count {
        let (identity, size) = decode_bytestring(&data[pos..])?;
        pos += size;
        let (alias_bytes, size) = decode_bytestring(&data[pos..])?;
        pos += size;
        let alias = if alias_bytes.is_empty() {
            None
        } else {
            Some(
                String::from_utf8(alias_bytes)
                    .map_err(|e| KernelError::Decode(format!("invalid alias utf-8: {e}")))?,
            )
        };
        table.push(Variable { identity, alias });
    }

    let (expr, _consumed) = decode_body(&data[pos..], &table)?;
    Ok(expr)
}

fn decode_body(data: &[u8], table: &[Variable]) -> Result<(Expr, usize)> {
    if data.is_empty() {
        return Err(KernelError::Decode("truncated expression body".into()));
    }
    let tag = data[0];
    macro_rules! binary {
        ($variant:ident) => {{
            let (a, a_size) = decode_body(&data[1..], table)?;
            let (b, b_size) = decode_body(&data[1 + a_size..], table)?;
            (Expr::$variant(Box::new(a), Box::new(b)), 1 + a_size + b_size)
        }};
    }
    macro_rules! unary {
        ($variant:ident) => {{
            let (a, a_size) = decode_body(&data[1..], table)?;
            (Expr::$variant(Box::new(a)), 1 + a_size)
        }};
    }

    Ok(match tag {
        TAG_CONSTANT => {
            let (value, size) = NumericValue::decode(&data[1..])?;
            (Expr::Constant(value), 1 + size)
        }
        TAG_VARIABLE => {
            if data.len() < 3 {
                return Err(KernelError::Decode("truncated variable index".into()));
            }
            let idx = u16::from_be_bytes(data[1..3].try_into().unwrap()) as usize;
            let var = table
                .get(idx)
                .ok_or_else(|| KernelError::Decode(format!("variable index {idx} out of range")))?
                .clone();
            (Expr::Variable(var), 3)
        }
        TAG_PLUS => binary!(Plus),
        TAG_MINUS => binary!(Minus),
        TAG_TIMES => binary!(Times),
        TAG_DIVIDE => binary!(Divide),
        TAG_MODULO => binary!(Modulo),
        TAG_POWER => binary!(Power),
        TAG_NEG => unary!(Neg),
        TAG_EXP => unary!(Exp),
        TAG_LOG => unary!(Log),
        TAG_COS => unary!(Cos),
        TAG_SIN => unary!(Sin),
        TAG_ABS => unary!(Abs),
        TAG_SIGN => unary!(Sign),
        other => return Err(KernelError::Decode(format!("unknown tag ordinal {other}"))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_s5_round_trips_with_alias_preserved() {
        let x = Expr::var_aliased("x", "x");
        let tree = x.clone().pow(2i32) + Expr::from(1i32);
        let encoded = serialize(&tree).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        assert_eq!(decoded, tree);
        // variable table: count=1, identity length-prefixed "x"
        assert_eq!(&encoded[0..2], &[0, 1]);
    }

    #[test]
    fn wildcard_cannot_be_encoded() {
        let tree = Expr::wildcard(0) + Expr::from(1i32);
        assert!(serialize(&tree).is_err());
    }

    #[test]
    fn shared_variable_identity_gets_one_table_entry() {
        let x = Expr::var("x");
        let tree = x.clone() + x;
        let encoded = serialize(&tree).unwrap();
        assert_eq!(&encoded[0..2], &[0, 1]);
    }

    #[test]
    fn later_occurrence_alias_wins_on_repeated_identity() {
        let x_first = Expr::var_aliased("x", "first");
        let x_second = Expr::var_aliased("x", "second");
        let tree = x_first + x_second;
        let encoded = serialize(&tree).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        match decoded {
            Expr::Plus(_, b) => match *b {
                Expr::Variable(v) => assert_eq!(v.alias.as_deref(), Some("second")),
                other => panic!("expected a variable, got {other:?}"),
            },
            other => panic!("expected Plus, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_decode_error() {
        let mut data = vec![0u8, 0u8]; // empty variable table
        data.push(250); // bogus tag
        assert!(deserialize(&data).is_err());
    }

    #[test]
    fn numeric_codec_still_used_for_constants() {
        let tree = Expr::from(42i32);
        let encoded = serialize(&tree).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        assert_eq!(decoded, tree);
    }
}
