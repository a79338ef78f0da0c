use super::error::ExpressionError;
use super::path::{Branch, NodePath};
use super::types::{BooleanOperator, ComparisonOperator, Expression};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};
use tracing::warn;

/// Decode an expression tree from its JSON form
pub fn parse_expression(value: &Value) -> Result<Expression, ExpressionError> {
    decode(value, &NodePath::root())
}

/// Decode an expression tree from JSON or JSON5 text
pub fn parse_expression_str(s: &str) -> Result<Expression, ExpressionError> {
    let value = json5::from_str::<Value>(s).map_err(|e| ExpressionError::Syntax(e.to_string()))?;
    parse_expression(&value)
}

/// Encode an expression tree into its JSON form
pub fn to_json(expr: &Expression) -> Value {
    match expr {
        Expression::Number { value } => json!({ "expr": "number", "value": number_value(*value) }),
        Expression::NumberRef { reference } => match reference {
            Some(reference) => json!({ "expr": "number-ref", "ref": reference }),
            None => json!({ "expr": "number-ref" }),
        },
        Expression::Comparison {
            operator,
            left,
            right,
        } => json!({
            "expr": operator.symbol(),
            "left": to_json(left),
            "right": to_json(right),
        }),
        Expression::Boolean {
            operator,
            left,
            right,
        } => json!({
            "expr": operator.symbol(),
            "left": to_json(left),
            "right": to_json(right),
        }),
        Expression::Group { operator, child } => json!({
            "expr": "group",
            "operator": operator.symbol(),
            "child": to_json(child),
        }),
    }
}

// Integral thresholds go out as `10`, not `10.0`
fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

fn decode(value: &Value, path: &NodePath) -> Result<Expression, ExpressionError> {
    let object = value.as_object().ok_or_else(|| ExpressionError::NotAnObject {
        path: path.to_string(),
    })?;

    let tag = object
        .get("expr")
        .ok_or_else(|| ExpressionError::MissingField {
            field: "expr",
            path: path.to_string(),
        })?
        .as_str()
        .ok_or_else(|| ExpressionError::InvalidField {
            field: "expr",
            path: path.to_string(),
            reason: "must be a string".to_string(),
        })?;

    match tag {
        "number" => decode_number(object, path),
        "number-ref" => decode_number_ref(object, path),
        "group" => {
            let operator = decode_group_operator(object, path)?;
            let child = decode_branch(object, Branch::Child, path)?;
            Ok(Expression::group(operator, child))
        }
        _ => {
            if let Some(operator) = BooleanOperator::parse(tag) {
                let left = decode_branch(object, Branch::Left, path)?;
                let right = decode_branch(object, Branch::Right, path)?;
                Ok(Expression::boolean(operator, left, right))
            } else if let Some(operator) = ComparisonOperator::parse(tag) {
                let left = decode_branch(object, Branch::Left, path)?;
                let right = decode_branch(object, Branch::Right, path)?;
                Ok(Expression::comparison(operator, left, right))
            } else {
                warn!(kind = tag, path = %path, "rejecting unrecognized expression kind");
                Err(ExpressionError::UnrecognizedExpressionKind {
                    kind: tag.to_string(),
                    path: path.to_string(),
                })
            }
        }
    }
}

fn decode_branch(
    object: &Map<String, Value>,
    branch: Branch,
    path: &NodePath,
) -> Result<Expression, ExpressionError> {
    let field = branch.name();
    let value = object
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ExpressionError::MissingField {
            field,
            path: path.to_string(),
        })?;
    decode(value, &path.join(branch))
}

fn decode_number(object: &Map<String, Value>, path: &NodePath) -> Result<Expression, ExpressionError> {
    let value = match object.get("value") {
        // A freshly created threshold may not carry a value yet
        None => 0.0,
        // JSON5 `Infinity`/`NaN` arrive here as null
        Some(v) => v
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| ExpressionError::InvalidField {
                field: "value",
                path: path.to_string(),
                reason: format!("expected a finite number, got {}", v),
            })?,
    };
    Ok(Expression::number(value))
}

fn decode_number_ref(
    object: &Map<String, Value>,
    path: &NodePath,
) -> Result<Expression, ExpressionError> {
    let reference = match object.get("ref") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(ExpressionError::InvalidField {
                field: "ref",
                path: path.to_string(),
                reason: format!("expected a string, got {}", other),
            });
        }
    };
    Ok(Expression::NumberRef { reference })
}

fn decode_group_operator(
    object: &Map<String, Value>,
    path: &NodePath,
) -> Result<BooleanOperator, ExpressionError> {
    let raw = object
        .get("operator")
        .ok_or_else(|| ExpressionError::MissingField {
            field: "operator",
            path: path.to_string(),
        })?;

    raw.as_str()
        .and_then(BooleanOperator::parse)
        .ok_or_else(|| ExpressionError::InvalidField {
            field: "operator",
            path: path.to_string(),
            reason: format!("expected '&&' or '||', got {}", raw),
        })
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_expression(&value).map_err(serde::de::Error::custom)
    }
}
