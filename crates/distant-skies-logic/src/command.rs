//! Player command parsing.
//!
//! Free text becomes a [`Command`] here; the rest of the crate only ever
//! sees the parsed variant.
//!
//! | Text                                                     | Command        |
//! |----------------------------------------------------------|----------------|
//! | `save`                                                   | `Save`         |
//! | `establish <body> [as <name>]`                           | `Establish`    |
//! | `get colonies [for\|on] <body>` (`view` works too)       | `GetColonies`  |
//! | `get ships [for <player>]`                               | `GetShips`     |
//! | `purchase <build> at <colony> [named <n>] [join <fleet>]`| `Purchase`     |
//! | `move fleet <fleet> to <destination>`                    | `MoveFleet`    |
//! | `end` / `end turn`                                       | `EndTurn`      |
//! | `stop`                                                   | `Stop`         |
//!
//! Names may contain the clause keywords themselves ("Gateway To Vega 2").
//! [`Command::parse_in`] settles such text against a [`Lexicon`] of known
//! names; [`Command::parse`] falls back to keyword order alone.

use thiserror::Error;

use crate::shipyard::PurchaseOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Save,
    Establish {
        body: String,
        colony_name: Option<String>,
    },
    GetColonies {
        body: String,
    },
    GetShips {
        player: Option<String>,
    },
    Purchase(PurchaseOrder),
    MoveFleet {
        fleet: String,
        destination: String,
    },
    EndTurn,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no command given")]
    Empty,
    #[error("\"{0}\" is not a recognized command")]
    UnknownVerb(String),
    #[error("incorrect syntax, the syntax for this action is: {0}")]
    MissingArgument(&'static str),
    #[error("\"{object}\" is not a recognized object for the verb \"{verb}\"")]
    UnknownObject { verb: String, object: String },
}

const ESTABLISH_USAGE: &str = "establish [name of body] (as [colony name])";
const COLONIES_USAGE: &str = "get colonies for [name of body]";
const PURCHASE_USAGE: &str = "purchase [build] at [colony] (named [ship name]) (join [fleet])";
const MOVE_USAGE: &str = "move fleet [fleet name] to [destination]";

/// Names a command can be checked against when its wording is ambiguous.
///
/// Clause keywords (`to`, `as`, `at`, `named`, `join`) may also be words
/// inside a body, colony or fleet name. Each reading of the text is scored
/// by how many of its names are known and the best one is kept.
pub trait Lexicon {
    fn is_body(&self, name: &str) -> bool;
    fn is_colony(&self, name: &str) -> bool;
    fn is_fleet(&self, name: &str) -> bool;
}

/// Knows no names, so only keyword order decides.
struct NoNames;

impl Lexicon for NoNames {
    fn is_body(&self, _: &str) -> bool {
        false
    }
    fn is_colony(&self, _: &str) -> bool {
        false
    }
    fn is_fleet(&self, _: &str) -> bool {
        false
    }
}

impl Command {
    /// Parse without any world context.
    ///
    /// `to` binds at its first occurrence, `as`, `named` and `join` at
    /// their last, so a keyword inside a destination or body name stays
    /// part of the name.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_in(text, &NoNames)
    }

    /// Parse, preferring the reading whose names `lexicon` recognizes.
    pub fn parse_in(text: &str, lexicon: &impl Lexicon) -> Result<Self, ParseError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Err(ParseError::Empty);
        };
        let verb = first.to_lowercase();
        let rest = &words[1..];

        match verb.as_str() {
            "save" => Ok(Self::Save),
            "stop" => Ok(Self::Stop),
            v if v.starts_with("end") => Ok(Self::EndTurn),
            "establish" => {
                let clauses = best_reading(rest, &[("as", Bind::Last)], &[], |c| {
                    recognized(c.head.as_deref(), |n| lexicon.is_body(n))
                });
                let body = clauses.head.clone().ok_or(ParseError::MissingArgument(ESTABLISH_USAGE))?;
                Ok(Self::Establish {
                    body,
                    colony_name: clauses.get("as"),
                })
            }
            "get" | "view" => parse_get(&verb, rest),
            "purchase" | "buy" => {
                let keywords = [("at", Bind::First), ("named", Bind::Last), ("join", Bind::Last)];
                let clauses = best_reading(rest, &keywords, &["at"], |c| {
                    recognized(c.get("at").as_deref(), |n| lexicon.is_colony(n))
                        + recognized(c.get("join").as_deref(), |n| lexicon.is_fleet(n))
                });
                let build = clauses.head.clone().ok_or(ParseError::MissingArgument(PURCHASE_USAGE))?;
                let origin_colony = clauses.get("at").ok_or(ParseError::MissingArgument(PURCHASE_USAGE))?;
                Ok(Self::Purchase(PurchaseOrder {
                    build,
                    origin_colony,
                    ship_name: clauses.get("named"),
                    join_fleet: clauses.get("join"),
                }))
            }
            "move" => {
                let Some(object) = rest.first() else {
                    return Err(ParseError::MissingArgument(MOVE_USAGE));
                };
                if object.to_lowercase() != "fleet" {
                    return Err(ParseError::UnknownObject {
                        verb,
                        object: object.to_string(),
                    });
                }
                let clauses = best_reading(&rest[1..], &[("to", Bind::First)], &["to"], |c| {
                    recognized(c.head.as_deref(), |n| lexicon.is_fleet(n))
                        + recognized(c.get("to").as_deref(), |n| lexicon.is_body(n) || lexicon.is_colony(n))
                });
                let fleet = clauses.head.clone().ok_or(ParseError::MissingArgument(MOVE_USAGE))?;
                let destination = clauses.get("to").ok_or(ParseError::MissingArgument(MOVE_USAGE))?;
                Ok(Self::MoveFleet { fleet, destination })
            }
            _ => Err(ParseError::UnknownVerb(first.to_string())),
        }
    }
}

fn recognized(name: Option<&str>, known: impl Fn(&str) -> bool) -> usize {
    usize::from(name.is_some_and(known))
}

fn parse_get(verb: &str, rest: &[&str]) -> Result<Command, ParseError> {
    let Some(object) = rest.first() else {
        return Err(ParseError::MissingArgument(COLONIES_USAGE));
    };
    let tail = skip_preposition(&rest[1..]);
    match object.to_lowercase().as_str() {
        "colonies" => {
            if tail.is_empty() {
                return Err(ParseError::MissingArgument(COLONIES_USAGE));
            }
            Ok(Command::GetColonies { body: tail.join(" ") })
        }
        "ships" => Ok(Command::GetShips {
            player: (!tail.is_empty()).then(|| tail.join(" ")),
        }),
        _ => Err(ParseError::UnknownObject {
            verb: verb.to_string(),
            object: object.to_string(),
        }),
    }
}

fn skip_preposition<'a>(words: &'a [&'a str]) -> &'a [&'a str] {
    match words.first().map(|w| w.to_lowercase()) {
        Some(w) if w == "for" || w == "on" || w == "of" => &words[1..],
        _ => words,
    }
}

/// Leading text plus `keyword → text` clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Clauses {
    head: Option<String>,
    tagged: Vec<(&'static str, String)>,
}

impl Clauses {
    fn get(&self, keyword: &str) -> Option<String> {
        self.tagged
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, v)| v.clone())
    }
}

/// Which occurrence of a repeated keyword starts its clause by default.
#[derive(Debug, Clone, Copy)]
enum Bind {
    First,
    Last,
}

/// Every way of cutting `words` at the keywords, default reading first.
///
/// Each keyword starts its clause at one of its occurrences or at none;
/// unused occurrences stay in the surrounding text.
fn readings(words: &[&str], keywords: &[(&'static str, Bind)]) -> Vec<Clauses> {
    let choices: Vec<Vec<Option<usize>>> = keywords
        .iter()
        .map(|(keyword, bind)| {
            let mut at: Vec<Option<usize>> = words
                .iter()
                .enumerate()
                .filter(|(_, w)| w.eq_ignore_ascii_case(keyword))
                .map(|(i, _)| Some(i))
                .collect();
            if let Bind::Last = bind {
                at.reverse();
            }
            at.push(None);
            at
        })
        .collect();

    let mut picks: Vec<Vec<Option<usize>>> = vec![Vec::new()];
    for options in &choices {
        picks = picks
            .into_iter()
            .flat_map(move |pick| {
                options.iter().map(move |option| {
                    let mut next = pick.clone();
                    next.push(*option);
                    next
                })
            })
            .collect();
    }

    picks
        .iter()
        .map(|pick| cut(words, keywords, pick))
        .collect()
}

fn cut(words: &[&str], keywords: &[(&'static str, Bind)], pick: &[Option<usize>]) -> Clauses {
    let mut cuts: Vec<(usize, &'static str)> = pick
        .iter()
        .zip(keywords)
        .filter_map(|(at, (keyword, _))| at.map(|i| (i, *keyword)))
        .collect();
    cuts.sort_unstable();

    let head_end = cuts.first().map_or(words.len(), |(i, _)| *i);
    let tagged = cuts
        .iter()
        .enumerate()
        .filter_map(|(n, (start, keyword))| {
            let end = cuts.get(n + 1).map_or(words.len(), |(i, _)| *i);
            join_words(&words[start + 1..end]).map(|text| (*keyword, text))
        })
        .collect();
    Clauses {
        head: join_words(&words[..head_end]),
        tagged,
    }
}

/// Highest scoring complete reading; ties go to the earlier one.
fn best_reading(
    words: &[&str],
    keywords: &[(&'static str, Bind)],
    required: &[&str],
    score: impl Fn(&Clauses) -> usize,
) -> Clauses {
    let all = readings(words, keywords);
    let mut best: Option<(usize, usize)> = None;
    for (index, reading) in all.iter().enumerate() {
        if reading.head.is_none() || required.iter().any(|k| reading.get(k).is_none()) {
            continue;
        }
        let points = score(reading);
        if best.map_or(true, |(top, _)| points > top) {
            best = Some((points, index));
        }
    }
    let index = best.map_or(0, |(_, index)| index);
    all.into_iter().nth(index).unwrap_or(Clauses {
        head: join_words(words),
        tagged: Vec::new(),
    })
}

fn join_words(parts: &[&str]) -> Option<String> {
    (!parts.is_empty()).then(|| parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_verbs() {
        assert_eq!(Command::parse("save"), Ok(Command::Save));
        assert_eq!(Command::parse("  STOP "), Ok(Command::Stop));
        assert_eq!(Command::parse("end"), Ok(Command::EndTurn));
        assert_eq!(Command::parse("end turn"), Ok(Command::EndTurn));
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn establish_with_and_without_name() {
        assert_eq!(
            Command::parse("establish Proxima 2b"),
            Ok(Command::Establish {
                body: "Proxima 2b".into(),
                colony_name: None
            })
        );
        assert_eq!(
            Command::parse("establish proxima 1 as New Haven"),
            Ok(Command::Establish {
                body: "proxima 1".into(),
                colony_name: Some("New Haven".into())
            })
        );
        assert!(matches!(
            Command::parse("establish"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    #[test]
    fn get_colonies_and_ships() {
        assert_eq!(
            Command::parse("get colonies for Proxima 3"),
            Ok(Command::GetColonies {
                body: "Proxima 3".into()
            })
        );
        assert_eq!(
            Command::parse("view colonies on proxima 3a"),
            Ok(Command::GetColonies {
                body: "proxima 3a".into()
            })
        );
        assert_eq!(
            Command::parse("get ships"),
            Ok(Command::GetShips { player: None })
        );
        assert_eq!(
            Command::parse("get ships for Player 2"),
            Ok(Command::GetShips {
                player: Some("Player 2".into())
            })
        );
        assert_eq!(
            Command::parse("get planets"),
            Err(ParseError::UnknownObject {
                verb: "get".into(),
                object: "planets".into()
            })
        );
    }

    #[test]
    fn purchase_clauses() {
        assert_eq!(
            Command::parse("purchase colony ship at New Haven named Mayflower join scout Fleet"),
            Ok(Command::Purchase(PurchaseOrder {
                build: "colony ship".into(),
                origin_colony: "New Haven".into(),
                ship_name: Some("Mayflower".into()),
                join_fleet: Some("scout Fleet".into()),
            }))
        );
        assert!(matches!(
            Command::parse("purchase fighter"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    #[test]
    fn move_fleet() {
        assert_eq!(
            Command::parse("move fleet fighter1 Fleet to Proxima 4"),
            Ok(Command::MoveFleet {
                fleet: "fighter1 Fleet".into(),
                destination: "Proxima 4".into()
            })
        );
        assert!(matches!(
            Command::parse("move ship x to y"),
            Err(ParseError::UnknownObject { .. })
        ));
        assert!(matches!(
            Command::parse("move fleet x"),
            Err(ParseError::MissingArgument(_))
        ));
    }

    #[test]
    fn keyword_inside_destination_stays_in_destination() {
        assert_eq!(
            Command::parse("move fleet fighter1 fleet to gateway to vega 2"),
            Ok(Command::MoveFleet {
                fleet: "fighter1 fleet".into(),
                destination: "gateway to vega 2".into()
            })
        );
        assert_eq!(
            Command::parse("establish gateway as vega 1 as Home"),
            Ok(Command::Establish {
                body: "gateway as vega 1".into(),
                colony_name: Some("Home".into())
            })
        );
    }

    struct Known {
        bodies: &'static [&'static str],
        colonies: &'static [&'static str],
        fleets: &'static [&'static str],
    }

    impl Lexicon for Known {
        fn is_body(&self, name: &str) -> bool {
            self.bodies.iter().any(|b| b.eq_ignore_ascii_case(name))
        }
        fn is_colony(&self, name: &str) -> bool {
            self.colonies.iter().any(|c| c.eq_ignore_ascii_case(name))
        }
        fn is_fleet(&self, name: &str) -> bool {
            self.fleets.iter().any(|f| f.eq_ignore_ascii_case(name))
        }
    }

    const KNOWN: Known = Known {
        bodies: &["Gateway As Vega 1", "Proxima 1"],
        colonies: &["Fort Named Hope"],
        fleets: &["go to sea Fleet"],
    };

    #[test]
    fn known_names_pick_the_reading() {
        assert_eq!(
            Command::parse_in("establish gateway as vega 1", &KNOWN),
            Ok(Command::Establish {
                body: "gateway as vega 1".into(),
                colony_name: None
            })
        );
        assert_eq!(
            Command::parse_in("purchase fighter at fort named hope", &KNOWN),
            Ok(Command::Purchase(PurchaseOrder {
                build: "fighter".into(),
                origin_colony: "fort named hope".into(),
                ship_name: None,
                join_fleet: None,
            }))
        );
        assert_eq!(
            Command::parse_in("move fleet go to sea fleet to proxima 1", &KNOWN),
            Ok(Command::MoveFleet {
                fleet: "go to sea fleet".into(),
                destination: "proxima 1".into()
            })
        );
        // Without names the keyword order decides.
        assert_eq!(
            Command::parse("purchase fighter at fort named hope"),
            Ok(Command::Purchase(PurchaseOrder {
                build: "fighter".into(),
                origin_colony: "fort".into(),
                ship_name: Some("hope".into()),
                join_fleet: None,
            }))
        );
    }

    #[test]
    fn unknown_verb() {
        assert_eq!(
            Command::parse("attack Proxima 1"),
            Err(ParseError::UnknownVerb("attack".into()))
        );
    }
}
