//! A minimal parser for the SQL subset this engine accepts (spec §1, §6
//! "Parser interface (consumed)"): `CREATE {TABLE|INDEX}`, `DROP
//! {TABLE|INDEX}`, `SHOW {TABLES|COLUMNS|INDEX}`. Not a general SQL parser —
//! out of scope per spec §1; this is the "external collaborator" spec §6
//! names, implemented just far enough to drive `sql_exec::SQLExec`.

use sql_exec::ast::{ColumnDef, Statement};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParseError(String);

fn fail(msg: impl Into<String>) -> ParseError {
    ParseError(msg.into())
}

/// Splits `input` into tokens, treating `(`, `)`, `,` as standalone tokens.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '(' | ')' | ',' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn upper(token: &str) -> String {
    token.to_ascii_uppercase()
}

pub fn parse(query: &str) -> Result<Statement, ParseError> {
    let query = query.trim().trim_end_matches(';');
    let tokens = tokenize(query);
    let mut iter = tokens.iter().map(String::as_str).peekable();

    let keyword = iter.next().ok_or_else(|| fail("empty statement"))?;
    match upper(keyword).as_str() {
        "CREATE" => parse_create(&mut iter),
        "DROP" => parse_drop(&mut iter),
        "SHOW" => parse_show(&mut iter),
        other => Err(fail(format!("unsupported statement: {other}"))),
    }
}

fn expect<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
    expected: &str,
) -> Result<(), ParseError> {
    match iter.next() {
        Some(tok) if upper(tok) == upper(expected) || tok == expected => Ok(()),
        Some(tok) => Err(fail(format!("expected '{expected}', found '{tok}'"))),
        None => Err(fail(format!("expected '{expected}', found end of statement"))),
    }
}

fn next_identifier<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<String, ParseError> {
    iter.next()
        .map(str::to_string)
        .ok_or_else(|| fail("expected an identifier"))
}

fn parse_create<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Statement, ParseError> {
    let kind = iter.next().ok_or_else(|| fail("expected TABLE or INDEX"))?;
    match upper(kind).as_str() {
        "TABLE" => parse_create_table(iter),
        "INDEX" => parse_create_index(iter),
        other => Err(fail(format!("expected TABLE or INDEX, found '{other}'"))),
    }
}

fn parse_create_table<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Statement, ParseError> {
    let mut if_not_exists = false;
    if iter.peek().map(|t| upper(t)).as_deref() == Some("IF") {
        iter.next();
        expect(iter, "NOT")?;
        expect(iter, "EXISTS")?;
        if_not_exists = true;
    }

    let table_name = next_identifier(iter)?;
    expect(iter, "(")?;

    let mut columns = Vec::new();
    loop {
        let name = next_identifier(iter)?;
        let data_type = next_identifier(iter)?;
        columns.push(ColumnDef {
            name,
            data_type: upper(&data_type),
        });
        match iter.next() {
            Some(",") => continue,
            Some(")") => break,
            Some(other) => return Err(fail(format!("expected ',' or ')', found '{other}'"))),
            None => return Err(fail("unterminated column list")),
        }
    }

    Ok(Statement::CreateTable {
        table_name,
        columns,
        if_not_exists,
    })
}

fn parse_create_index<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Statement, ParseError> {
    let index_name = next_identifier(iter)?;
    expect(iter, "ON")?;
    let table_name = next_identifier(iter)?;
    expect(iter, "(")?;

    let mut columns = Vec::new();
    loop {
        columns.push(next_identifier(iter)?);
        match iter.next() {
            Some(",") => continue,
            Some(")") => break,
            Some(other) => return Err(fail(format!("expected ',' or ')', found '{other}'"))),
            None => return Err(fail("unterminated column list")),
        }
    }

    expect(iter, "USING")?;
    let index_type = upper(&next_identifier(iter)?);

    Ok(Statement::CreateIndex {
        index_name,
        table_name,
        columns,
        index_type,
    })
}

fn parse_drop<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Statement, ParseError> {
    let kind = iter.next().ok_or_else(|| fail("expected TABLE or INDEX"))?;
    match upper(kind).as_str() {
        "TABLE" => {
            let table_name = next_identifier(iter)?;
            Ok(Statement::DropTable { table_name })
        }
        "INDEX" => {
            let index_name = next_identifier(iter)?;
            expect(iter, "FROM")?;
            let table_name = next_identifier(iter)?;
            Ok(Statement::DropIndex {
                index_name,
                table_name,
            })
        }
        other => Err(fail(format!("expected TABLE or INDEX, found '{other}'"))),
    }
}

fn parse_show<'a>(
    iter: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Result<Statement, ParseError> {
    let kind = iter
        .next()
        .ok_or_else(|| fail("expected TABLES, COLUMNS or INDEX"))?;
    match upper(kind).as_str() {
        "TABLES" => Ok(Statement::ShowTables),
        "COLUMNS" => {
            if iter.peek().is_none() {
                return Ok(Statement::ShowColumns { table_name: None });
            }
            expect(iter, "FROM")?;
            let table_name = next_identifier(iter)?;
            Ok(Statement::ShowColumns {
                table_name: Some(table_name),
            })
        }
        "INDEX" => {
            expect(iter, "FROM")?;
            let table_name = next_identifier(iter)?;
            Ok(Statement::ShowIndex { table_name })
        }
        other => Err(fail(format!(
            "expected TABLES, COLUMNS or INDEX, found '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_table() {
        let stmt = parse("CREATE TABLE foo (a INT, b TEXT)").unwrap();
        assert_eq!(
            stmt,
            Statement::CreateTable {
                table_name: "foo".to_string(),
                columns: vec![
                    ColumnDef {
                        name: "a".to_string(),
                        data_type: "INT".to_string()
                    },
                    ColumnDef {
                        name: "b".to_string(),
                        data_type: "TEXT".to_string()
                    },
                ],
                if_not_exists: false,
            }
        );
    }

    #[test]
    fn parses_create_index() {
        let stmt = parse("CREATE INDEX fx ON foo (a) USING BTREE").unwrap();
        assert_eq!(
            stmt,
            Statement::CreateIndex {
                index_name: "fx".to_string(),
                table_name: "foo".to_string(),
                columns: vec!["a".to_string()],
                index_type: "BTREE".to_string(),
            }
        );
    }

    #[test]
    fn parses_drop_index_from() {
        let stmt = parse("DROP INDEX fx FROM foo").unwrap();
        assert_eq!(
            stmt,
            Statement::DropIndex {
                index_name: "fx".to_string(),
                table_name: "foo".to_string(),
            }
        );
    }

    #[test]
    fn parses_show_columns_from() {
        let stmt = parse("SHOW COLUMNS FROM foo").unwrap();
        assert_eq!(
            stmt,
            Statement::ShowColumns {
                table_name: Some("foo".to_string())
            }
        );
    }

    #[test]
    fn rejects_unknown_statement() {
        assert!(parse("SELECT * FROM foo").is_err());
    }
}
