//! The symbolic instruction model.
//!
//! The logic-engine collaborator hands over a textual list of facts of
//! the form `item(<id>, <color>, <shape>, <pose>, <action>)`. Parsing
//! happens exactly once, here, into a tagged [`Action`]; downstream code
//! matches on the variant and never re-reads text. Malformed facts fail
//! loudly with a [`ParseError`] instead of being silently dropped.

use crate::error::ParseError;
use crate::resources::{Pose, Shape};

/// What a single instruction asks the placement engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Place independently, anchored near the scene anchor.
    Grounded,
    /// Place flush against a free face of the target.
    Touching(u32),
    /// Place so the object's rays pass through the target.
    Pointing(u32),
    /// Stacking; unresolved relation kind, rejected at placement time.
    OnTopOf(u32),
}

impl Action {
    /// Target id for relation actions, `None` for grounded.
    pub fn target(&self) -> Option<u32> {
        match *self {
            Action::Grounded => None,
            Action::Touching(t) | Action::Pointing(t) | Action::OnTopOf(t) => Some(t),
        }
    }
}

/// One parsed `item(..)` fact.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub id: u32,
    pub color: String,
    pub shape: Shape,
    pub pose: Pose,
    pub action: Action,
}

/// Extract and parse every `item(..)` fact in `raw`.
///
/// Accepts the fact list however the oracle chooses to frame it (bare
/// facts, one per line, or a bracketed list); everything outside
/// `item(...)` terms is ignored. The parsed set is validated as a whole:
/// unique ids, at least one grounded instruction, and every relation
/// target realized earlier in evaluation order.
pub fn parse_items(raw: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut instructions = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find("item(") {
        let body_start = start + "item(".len();
        let tail = &rest[body_start..];
        let mut depth = 1usize;
        let mut end = None;
        for (i, c) in tail.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let end = end.ok_or_else(|| ParseError::Malformed {
            fact: rest[start..].trim().to_string(),
        })?;
        instructions.push(parse_fact(&tail[..end])?);
        rest = &tail[end + 1..];
    }
    validate(&instructions)?;
    Ok(instructions)
}

fn parse_fact(body: &str) -> Result<Instruction, ParseError> {
    let malformed = || ParseError::Malformed {
        fact: format!("item({})", body.trim()),
    };
    let fields = split_top_level(body);
    if fields.len() != 5 {
        return Err(malformed());
    }
    let id: u32 = fields[0].parse().map_err(|_| malformed())?;
    let color = fields[1].to_string();
    let shape = Shape::from_ident(fields[2]).ok_or_else(|| ParseError::UnknownShape {
        ident: fields[2].to_string(),
        fact: format!("item({})", body.trim()),
    })?;
    let pose = Pose::from_ident(fields[3]).ok_or_else(|| ParseError::UnknownPose {
        ident: fields[3].to_string(),
        fact: format!("item({})", body.trim()),
    })?;
    let action = parse_action(fields[4], body)?;
    Ok(Instruction {
        id,
        color,
        shape,
        pose,
        action,
    })
}

fn parse_action(field: &str, body: &str) -> Result<Action, ParseError> {
    if field == "grounded" {
        return Ok(Action::Grounded);
    }
    let fact = format!("item({})", body.trim());
    let open = field.find('(');
    let close = field.rfind(')');
    let (name, target) = match (open, close) {
        (Some(o), Some(c)) if o < c => (&field[..o], &field[o + 1..c]),
        _ => {
            return Err(ParseError::Malformed { fact });
        }
    };
    let target: u32 = target
        .trim()
        .parse()
        .map_err(|_| ParseError::Malformed { fact: fact.clone() })?;
    match name {
        "touching" => Ok(Action::Touching(target)),
        "pointing" => Ok(Action::Pointing(target)),
        "on_top_of" => Ok(Action::OnTopOf(target)),
        _ => Err(ParseError::UnknownRelation {
            ident: name.to_string(),
            fact,
        }),
    }
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut field_start = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                fields.push(body[field_start..i].trim());
                field_start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(body[field_start..].trim());
    fields
}

fn validate(instructions: &[Instruction]) -> Result<(), ParseError> {
    let mut seen = std::collections::HashSet::new();
    for instruction in instructions {
        if !seen.insert(instruction.id) {
            return Err(ParseError::DuplicateId { id: instruction.id });
        }
    }
    if !instructions.iter().any(|i| i.action == Action::Grounded) {
        return Err(ParseError::MissingGrounded);
    }
    // Evaluation order: grounded ascending by id, then relational
    // ascending by id. A relation may only target something realized
    // before it under that order.
    for instruction in instructions {
        if let Some(target) = instruction.action.target() {
            let resolved_earlier = instructions.iter().any(|other| {
                other.id == target
                    && (other.action == Action::Grounded || other.id < instruction.id)
            });
            if !resolved_earlier {
                return Err(ParseError::ForwardTarget {
                    id: instruction.id,
                    target,
                });
            }
        }
    }
    Ok(())
}

/// Split into (grounded, relational), each sorted ascending by id.
pub fn partition(instructions: &[Instruction]) -> (Vec<Instruction>, Vec<Instruction>) {
    let mut grounded: Vec<Instruction> = instructions
        .iter()
        .filter(|i| i.action == Action::Grounded)
        .cloned()
        .collect();
    let mut relational: Vec<Instruction> = instructions
        .iter()
        .filter(|i| i.action != Action::Grounded)
        .cloned()
        .collect();
    grounded.sort_by_key(|i| i.id);
    relational.sort_by_key(|i| i.id);
    (grounded, relational)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_bracketed_fact_list() {
        let raw = "['item(0, blue, block, upright, grounded)', \
                   'item(1, red, pyramid, upright, touching(0))']";
        let instructions = parse_items(raw).unwrap();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].action, Action::Grounded);
        assert_eq!(instructions[0].shape, Shape::Block);
        assert_eq!(instructions[1].action, Action::Touching(0));
        assert_eq!(instructions[1].color, "red");
    }

    #[test]
    fn malformed_fact_fails_loudly() {
        let raw = "item(0, blue, block, upright)";
        assert!(matches!(
            parse_items(raw),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_shape_names_the_fact() {
        let raw = "item(0, blue, sphere, upright, grounded)";
        match parse_items(raw) {
            Err(ParseError::UnknownShape { ident, .. }) => assert_eq!(ident, "sphere"),
            other => panic!("expected UnknownShape, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = "item(0, blue, block, upright, grounded) \
                   item(0, red, wedge, upright, grounded)";
        assert_eq!(parse_items(raw), Err(ParseError::DuplicateId { id: 0 }));
    }

    #[test]
    fn relation_must_target_something_realized_earlier() {
        let raw = "item(0, blue, block, upright, grounded) \
                   item(1, red, pyramid, upright, pointing(2)) \
                   item(2, green, wedge, upright, touching(0))";
        assert_eq!(
            parse_items(raw),
            Err(ParseError::ForwardTarget { id: 1, target: 2 })
        );
    }

    #[test]
    fn grounded_is_required() {
        let raw = "item(1, red, pyramid, upright, touching(1))";
        assert_eq!(parse_items(raw), Err(ParseError::MissingGrounded));
    }

    #[test]
    fn partition_sorts_both_classes_by_id() {
        let raw = "item(3, blue, block, upright, grounded) \
                   item(0, red, block, upright, grounded) \
                   item(5, green, pyramid, upright, pointing(0)) \
                   item(4, yellow, wedge, upright, touching(3))";
        let instructions = parse_items(raw).unwrap();
        let (grounded, relational) = partition(&instructions);
        let grounded_ids: Vec<u32> = grounded.iter().map(|i| i.id).collect();
        let relational_ids: Vec<u32> = relational.iter().map(|i| i.id).collect();
        assert_eq!(grounded_ids, vec![0, 3]);
        assert_eq!(relational_ids, vec![4, 5]);
    }
}
