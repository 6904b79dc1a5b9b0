use std::fs;

use log::info;

use crate::interpreter::Interpreter;
use crate::lexer::{format_number, Literal, Scanner, Token, TokenType};
use crate::parser::Parser;

pub const EXIT_OK: i32 = 0;
pub const EXIT_SYNTAX_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;
pub const EXIT_USAGE_ERROR: i32 = 1;

/// Reads `path` and runs `command` over it, returning the process exit code
/// (0 success, 65 lexical/syntax error, 70 runtime error, 1 usage error).
/// `debug` additionally prints the token stream regardless of command,
/// mirroring the original's `-d` flag.
pub fn run(command: &str, path: &str, debug: bool) -> i32 {
    let source = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            eprintln!("Error reading file {path}: {err}");
            return EXIT_USAGE_ERROR;
        }
    };

    info!("running command={command} path={path}");

    let (tokens, had_scan_error) = Scanner::new(source).scan_tokens();

    if debug {
        print_tokens(&tokens);
    }

    match command {
        "tokenize" => {
            if !debug {
                print_tokens(&tokens);
            }
            if had_scan_error {
                EXIT_SYNTAX_ERROR
            } else {
                EXIT_OK
            }
        }
        "parse" => {
            if had_scan_error {
                return EXIT_SYNTAX_ERROR;
            }
            let (statements, had_parse_error) = Parser::new(tokens).parse();
            if had_parse_error {
                return EXIT_SYNTAX_ERROR;
            }
            if debug {
                for stmt in &statements {
                    println!("{stmt}");
                }
            }
            EXIT_OK
        }
        "run" => {
            if had_scan_error {
                return EXIT_SYNTAX_ERROR;
            }
            let (statements, had_parse_error) = Parser::new(tokens).parse();
            if had_parse_error {
                return EXIT_SYNTAX_ERROR;
            }
            match Interpreter::new().interpret(&statements) {
                Ok(()) => EXIT_OK,
                Err(_) => EXIT_RUNTIME_ERROR,
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            EXIT_USAGE_ERROR
        }
    }
}

fn print_tokens(tokens: &[Token]) {
    for token in tokens {
        println!("{}", token_repr(token));
    }
}

fn token_repr(token: &Token) -> String {
    let literal = match (&token.token_type, &token.literal) {
        (TokenType::Eof, _) => "null".to_string(),
        (TokenType::String, Literal::String(s)) => s.clone(),
        (TokenType::Number, Literal::Number(n)) => format_number(*n, true),
        _ => "null".to_string(),
    };
    format!("{} {} {}", token.token_type, token.lexeme, literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_repr_renders_eof_with_empty_lexeme() {
        let eof = Token::eof(1);
        assert_eq!(token_repr(&eof), "EOF  null");
    }

    #[test]
    fn token_repr_renders_number_literal_with_tokenize_formatting() {
        let tok = Token::new(TokenType::Number, "42".to_string(), Literal::Number(42.0), 1);
        assert_eq!(token_repr(&tok), "NUMBER 42 42.0");
    }

    #[test]
    fn token_repr_renders_string_literal_without_quotes() {
        let tok = Token::new(
            TokenType::String,
            "\"hi\"".to_string(),
            Literal::String("hi".to_string()),
            1,
        );
        assert_eq!(token_repr(&tok), "STRING \"hi\" hi");
    }
}
