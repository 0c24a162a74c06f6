use crate::dispatch::request::{Direction, Request};

/// One line of operator input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Shutdown,
    Request(Request),
    Invalid,
}

/// Parses `SHUTDOWN` or `<origin> <destination> <UP|DOWN>`.
///
/// Floors must be plain digits; range and direction rules are left to the
/// dispatcher's validator.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim();
    if line.eq_ignore_ascii_case("SHUTDOWN") {
        return Command::Shutdown;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (origin, destination, direction) = match tokens.as_slice() {
        [origin, destination, direction] => (*origin, *destination, *direction),
        _ => return Command::Invalid,
    };
    let direction = match direction {
        "UP" => Direction::Up,
        "DOWN" => Direction::Down,
        _ => return Command::Invalid,
    };
    match (parse_floor(origin), parse_floor(destination)) {
        (Some(origin), Some(destination)) => Command::Request(Request::new(origin, destination, direction)),
        _ => Command::Invalid,
    }
}

fn parse_floor(token: &str) -> Option<i32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<i32>().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_requests() {
        assert_eq!(
            parse_line("3 7 UP"),
            Command::Request(Request::new(3, 7, Direction::Up))
        );
        assert_eq!(
            parse_line("  9\t2   DOWN "),
            Command::Request(Request::new(9, 2, Direction::Down))
        );
    }

    #[test]
    fn it_parses_shutdown_in_any_case() {
        assert_eq!(parse_line("SHUTDOWN"), Command::Shutdown);
        assert_eq!(parse_line("shutdown\n"), Command::Shutdown);
        assert_eq!(parse_line("ShutDown"), Command::Shutdown);
    }

    #[test]
    fn it_rejects_lowercase_direction() {
        assert_eq!(parse_line("3 7 up"), Command::Invalid);
    }

    #[test]
    fn it_rejects_signed_or_non_numeric_floors() {
        assert_eq!(parse_line("-1 3 UP"), Command::Invalid);
        assert_eq!(parse_line("+1 3 UP"), Command::Invalid);
        assert_eq!(parse_line("one 3 UP"), Command::Invalid);
        assert_eq!(parse_line("99999999999 3 DOWN"), Command::Invalid);
    }

    #[test]
    fn it_rejects_wrong_token_count() {
        assert_eq!(parse_line("3 UP"), Command::Invalid);
        assert_eq!(parse_line("3 7 UP now"), Command::Invalid);
        assert_eq!(parse_line(""), Command::Invalid);
    }

    #[test]
    fn it_leaves_range_checks_to_the_validator() {
        assert_eq!(
            parse_line("3 3 UP"),
            Command::Request(Request::new(3, 3, Direction::Up))
        );
    }
}
