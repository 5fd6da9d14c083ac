//! Console commands
//!
//! Parses one line of console input into either a shopper `UserIntent` or a
//! read-only query the console answers directly.
//!
//! ```text
//! user 2                      select user 2
//! search desk lamp            change the search text, keep other filters
//! filter category=Home sort=price_asc min=10 max=50
//! clear                       drop every filter
//! view 3 | close              open / close product detail
//! hover 4 | leave             rating star preview
//! rate 5                      rate the open product
//! cart 3 [products|recommendations|detail]
//! history | stats | reviews 3 | help | quit
//! ```

use std::str::FromStr;
use thiserror::Error;

use crate::domain::entities::{RatingValue, UserId};
use crate::domain::events::{CartControl, GridTarget, UserIntent};
use crate::domain::filter::FilterCriteria;
use crate::domain::product::ProductId;

pub const HELP: &str = "commands: user <id>, search <text>, filter key=value..., clear, \
view <id>, close, hover <1-5>, leave, rate <1-5>, cart <id> [products|recommendations|detail], \
history, stats, reviews <id>, help, quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Intent(UserIntent),
    History,
    Stats,
    Reviews(ProductId),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{command}`: invalid value `{value}`")]
    InvalidArgument { command: &'static str, value: String },

    #[error("`filter`: unknown key `{0}` (search, category, sort, min, max)")]
    UnknownFilterKey(String),
}

impl FromStr for ConsoleCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        parse_command(line)
    }
}

pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let intent = match verb.to_lowercase().as_str() {
        "" => return Err(CommandError::Empty),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "history" => return Ok(ConsoleCommand::History),
        "stats" => return Ok(ConsoleCommand::Stats),
        "reviews" => return Ok(ConsoleCommand::Reviews(ProductId(number("reviews", "a product id", rest)?))),

        "user" => UserIntent::SelectUser(UserId(number("user", "a user id", rest)?)),
        "search" => UserIntent::Search(rest.to_string()),
        "filter" => UserIntent::ApplyFilters(parse_filter(rest)?),
        "clear" => UserIntent::ClearFilters,
        "view" => UserIntent::ShowProduct(ProductId(number("view", "a product id", rest)?)),
        "close" => UserIntent::CloseDetail,
        "hover" => UserIntent::HoverStar(number("hover", "a star count", rest)?),
        "leave" => UserIntent::LeaveStars,
        "rate" => {
            let stars: u8 = number("rate", "a star count", rest)?;
            let rating = RatingValue::new(stars).map_err(|_| CommandError::InvalidArgument {
                command: "rate",
                value: rest.to_string(),
            })?;
            UserIntent::Rate(rating)
        }
        "cart" => UserIntent::AddToCart(parse_cart(rest)?),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(ConsoleCommand::Intent(intent))
}

fn number<T: FromStr>(command: &'static str, argument: &'static str, raw: &str) -> Result<T, CommandError> {
    let raw = raw.split_whitespace().next().ok_or(CommandError::MissingArgument { command, argument })?;
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        value: raw.to_string(),
    })
}

/// `key=value` pairs; a bare word continues the previous value so
/// `category=Home & Garden` keeps its spaces
fn parse_filter(rest: &str) -> Result<FilterCriteria, CommandError> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for token in rest.split_whitespace() {
        match token.split_once('=') {
            Some((key, value)) => fields.push((key.to_lowercase(), value.to_string())),
            None => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(token);
                }
                None => {
                    return Err(CommandError::InvalidArgument {
                        command: "filter",
                        value: token.to_string(),
                    });
                }
            },
        }
    }

    let (mut search, mut category, mut sort, mut min, mut max) = ("", "", "", "", "");
    for (key, value) in &fields {
        match key.as_str() {
            "search" | "q" => search = value,
            "category" => category = value,
            "sort" | "sort_by" => sort = value,
            "min" | "min_price" => min = value,
            "max" | "max_price" => max = value,
            other => return Err(CommandError::UnknownFilterKey(other.to_string())),
        }
    }

    Ok(FilterCriteria::from_inputs(search, category, sort, min, max))
}

fn parse_cart(rest: &str) -> Result<CartControl, CommandError> {
    let mut words = rest.split_whitespace();
    let product = ProductId(number("cart", "a product id", words.next().unwrap_or(""))?);

    match words.next().map(str::to_lowercase).as_deref() {
        None | Some("products") => Ok(CartControl::in_grid(product, GridTarget::Products)),
        Some("recommendations" | "rec") => Ok(CartControl::in_grid(product, GridTarget::Recommendations)),
        Some("detail") => Ok(CartControl::in_detail(product)),
        Some(other) => Err(CommandError::InvalidArgument {
            command: "cart",
            value: other.to_string(),
        }),
    }
}
