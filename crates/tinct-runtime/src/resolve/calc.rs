//! `calc()` evaluation
//!
//! A shunting-yard evaluator over the flat token stream the compiler emits:
//! numbers, percentage strings, operators and parentheses. Nested functions
//! are resolved first. Adding or subtracting a number and a percentage
//! fails, so a whole expression yields either a number or a percentage.

use tinct_core::{format_number, StyleDescriptor, StyleFunction, StyleValue};

use super::ResolveContext;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Number,
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Operand {
    value: f64,
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Operand(Operand),
    Operator(char),
    Open,
    Close,
}

fn precedence(operator: char) -> u8 {
    match operator {
        '*' | '/' => 2,
        _ => 1,
    }
}

fn operand(value: &StyleValue) -> Option<Operand> {
    match value {
        StyleValue::Number(n) => Some(Operand { value: *n, mode: Mode::Number }),
        StyleValue::String(s) => {
            let value = s.trim().strip_suffix('%')?.parse().ok()?;
            Some(Operand { value, mode: Mode::Percentage })
        }
        _ => None,
    }
}

fn tokens(context: &mut ResolveContext<'_>, stream: &[StyleDescriptor]) -> Option<Vec<Token>> {
    stream
        .iter()
        .map(|item| match item {
            StyleDescriptor::String(s) => Some(match s.as_str() {
                "(" => Token::Open,
                ")" => Token::Close,
                op @ ("+" | "-" | "*" | "/") => Token::Operator(op.chars().next()?),
                _ => Token::Operand(operand(&StyleValue::String(s.clone()))?),
            }),
            StyleDescriptor::Number(n) => {
                Some(Token::Operand(Operand { value: *n, mode: Mode::Number }))
            }
            other => Some(Token::Operand(operand(&context.resolve(other)?)?)),
        })
        .collect()
}

fn apply(operator: char, left: Operand, right: Operand) -> Option<Operand> {
    use Mode::{Number, Percentage};
    match operator {
        '+' | '-' if left.mode == right.mode => {
            let value = if operator == '+' {
                left.value + right.value
            } else {
                left.value - right.value
            };
            Some(Operand { value, mode: left.mode })
        }
        '*' => match (left.mode, right.mode) {
            (Percentage, Percentage) => None,
            (Number, Number) => Some(Operand { value: left.value * right.value, mode: Number }),
            _ => Some(Operand { value: left.value * right.value, mode: Percentage }),
        },
        '/' if right.mode == Number && right.value != 0.0 => {
            Some(Operand { value: left.value / right.value, mode: left.mode })
        }
        _ => None,
    }
}

fn reduce(operands: &mut Vec<Operand>, operator: char) -> Option<()> {
    let right = operands.pop()?;
    let left = operands.pop()?;
    operands.push(apply(operator, left, right)?);
    Some(())
}

fn evaluate(tokens: &[Token]) -> Option<Operand> {
    let mut operands: Vec<Operand> = Vec::new();
    let mut operators: Vec<Token> = Vec::new();

    for token in tokens {
        match *token {
            Token::Operand(operand) => operands.push(operand),
            Token::Open => operators.push(Token::Open),
            Token::Close => loop {
                match operators.pop()? {
                    Token::Open => break,
                    Token::Operator(op) => reduce(&mut operands, op)?,
                    _ => return None,
                }
            },
            Token::Operator(op) => {
                while let Some(&Token::Operator(top)) = operators.last() {
                    if precedence(top) < precedence(op) {
                        break;
                    }
                    operators.pop();
                    reduce(&mut operands, top)?;
                }
                operators.push(Token::Operator(op));
            }
        }
    }
    while let Some(token) = operators.pop() {
        match token {
            Token::Operator(op) => reduce(&mut operands, op)?,
            _ => return None,
        }
    }
    match operands.as_slice() {
        [result] => Some(*result),
        _ => None,
    }
}

pub fn resolve(context: &mut ResolveContext<'_>, function: &StyleFunction) -> Option<StyleValue> {
    let tokens = tokens(context, &function.arguments)?;
    let result = evaluate(&tokens)?;
    if !result.value.is_finite() {
        return None;
    }
    let value = (result.value * 1e6).round() / 1e6;
    Some(match result.mode {
        Mode::Number => StyleValue::Number(value),
        Mode::Percentage => StyleValue::String(format!("{}%", format_number(value))),
    })
}
