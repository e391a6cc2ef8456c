//! Shared entity fixtures for unit tests.

use uuid::Uuid;

use crate::entity::{Entity, FieldSpec};

/// Every field carries an explicit column name; the sentinel supplies the
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tweet {
    pub timeline: String,
    pub id: Uuid,
    pub text: String,
}

impl Entity for Tweet {
    fn fields() -> Vec<FieldSpec<Self>> {
        vec![
            FieldSpec::table("tweet"),
            FieldSpec::new(
                "timeline",
                "timeline,",
                |t| t.timeline.clone().into(),
                |t, v| {
                    t.timeline = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "id",
                "id,",
                |t| t.id.into(),
                |t, v| {
                    t.id = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "text",
                "text,",
                |t| t.text.clone().into(),
                |t, v| {
                    t.text = v.try_into()?;
                    Ok(())
                },
            ),
        ]
    }
}

/// Exercises defaulted column names, an options tail, and the exclusion
/// marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub score: f64,
    pub session_token: String,
}

impl Entity for Player {
    fn fields() -> Vec<FieldSpec<Self>> {
        vec![
            FieldSpec::table("players"),
            FieldSpec::new(
                "id",
                "",
                |p| p.id.into(),
                |p, v| {
                    p.id = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "name",
                "name,index",
                |p| p.name.clone().into(),
                |p, v| {
                    p.name = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "age",
                "age,",
                |p| p.age.into(),
                |p, v| {
                    p.age = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "score",
                "score,",
                |p| p.score.into(),
                |p, v| {
                    p.score = v.try_into()?;
                    Ok(())
                },
            ),
            FieldSpec::new(
                "session_token",
                "-",
                |p| p.session_token.clone().into(),
                |p, v| {
                    p.session_token = v.try_into()?;
                    Ok(())
                },
            ),
        ]
    }
}

/// No sentinel field: usable only through the explicit-table entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Orphan {
    pub id: i64,
}

impl Entity for Orphan {
    fn fields() -> Vec<FieldSpec<Self>> {
        vec![FieldSpec::new(
            "id",
            "id,",
            |o| o.id.into(),
            |o, v| {
                o.id = v.try_into()?;
                Ok(())
            },
        )]
    }
}

/// A sentinel annotated with the exclusion marker, which is not a legal
/// table name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadTable {
    pub id: i64,
}

impl Entity for BadTable {
    fn fields() -> Vec<FieldSpec<Self>> {
        vec![
            FieldSpec::table("-"),
            FieldSpec::new(
                "id",
                "id,",
                |b| b.id.into(),
                |b, v| {
                    b.id = v.try_into()?;
                    Ok(())
                },
            ),
        ]
    }
}
