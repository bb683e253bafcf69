mod common;

use common::{compile_ok, scratch_path};
use teeny::cli::command;
use teeny::compiler::{
    self,
    phases::{
        parse, resolve, tokenize,
        types::{Loc, Located},
        Rule, TokenKind,
    },
    Error,
};

#[test]
fn let_then_print() {
    let code = compile_ok("LET x = 5\nPRINT x\n");
    assert_eq!(
        code,
        "\
#include <stdio.h>
float x;
int main(void){
x = 5;
printf(\"%.2f\\n\", (float)(x));
return 0;
}
"
    );
}

#[test]
fn if_then_print_string() {
    let code = compile_ok("IF 1 > 0 THEN\nPRINT \"hi\"\nENDIF\n");
    assert!(code.contains("if(1 > 0){\nprintf(\"hi\\n\");\n}\n"));
}

#[test]
fn goto_without_label() {
    let err = compiler::compile("GOTO foo\n").unwrap_err();
    assert_eq!(
        err,
        Error::Resolve(Located::with_loc(
            Loc::new(1, 6),
            resolve::Error::UnknownLabel("foo".to_owned())
        ))
    );
    assert!(!err.is_lexical());
}

#[test]
fn failed_compile_writes_nothing() {
    let out = scratch_path("goto.c");
    let _ = std::fs::remove_file(&out);

    assert!(command::compile_to_path("GOTO foo\n", &out).is_err());
    assert!(!out.exists());

    command::compile_to_path("LABEL foo\nGOTO foo\n", &out).unwrap();
    let written = std::fs::read_to_string(&out).unwrap();
    std::fs::remove_file(&out).unwrap();
    assert!(written.contains("foo:\ngoto foo;\n"));
}

#[test]
fn trailing_dot_is_a_lexing_error() {
    let err = compiler::compile("LET x = 1.\n").unwrap_err();
    assert!(err.is_lexical());
    assert_eq!(
        err,
        Error::Tokenize(Located::with_loc(
            Loc::new(1, 9),
            tokenize::Error::MalformedNumber("1.".to_owned())
        ))
    );
}

#[test]
fn forward_variable_reference() {
    let err = compiler::compile("LET a = 1\nLET b = a + c\nLET c = 2\n").unwrap_err();
    assert_eq!(
        err,
        Error::Resolve(Located::with_loc(
            Loc::new(2, 13),
            resolve::Error::UndeclaredVariable("c".to_owned())
        ))
    );
}

#[test]
fn backward_and_forward_gotos() {
    let source = "\
LET n = 3
LABEL again
IF n == 0 THEN
    GOTO done
ENDIF
PRINT n
LET n = n - 1
GOTO again
LABEL done
";
    let code = compile_ok(source);
    assert!(code.contains("again:\n"));
    assert!(code.contains("goto done;\n"));
    assert!(code.contains("goto again;\n"));
    assert!(code.ends_with("done:\nreturn 0;\n}\n"));
}

#[test]
fn first_error_wins() {
    // The lexing error on line 2 is never reached.
    let err = compiler::compile("PRINT nope\nLET x = 1.\n").unwrap_err();
    assert_eq!(err.loc(), Loc::new(1, 7));
}

#[test]
fn check_matches_compile() {
    let source = "INPUT a\nWHILE a > 0 REPEAT\nLET a = a - 1\nENDWHILE\n";
    let trace = compiler::check(source).unwrap();
    let (_, compiled_trace) = compiler::compile_traced(source).unwrap();
    assert_eq!(trace, compiled_trace);
    assert_eq!(trace[0], Rule::Program);
    assert_eq!(trace[1], Rule::Statement(TokenKind::Input));
}

#[test]
fn check_reports_the_same_errors() {
    for source in ["GOTO x\n", "PRINT 1 +\n", "LET 5 = 1\n", "PRINT \"%d\"\n"].iter() {
        assert_eq!(
            compiler::check(source).unwrap_err(),
            compiler::compile(source).unwrap_err()
        );
    }
}

#[test]
fn expected_token_error() {
    assert_eq!(
        compiler::compile("LET 5 = 1\n").unwrap_err(),
        Error::Parse(Located::with_loc(
            Loc::new(1, 5),
            parse::Error::UnexpectedToken {
                expected: TokenKind::Ident,
                found: TokenKind::Number
            }
        ))
    );
}

#[test]
fn error_display() {
    let err = compiler::compile("GOTO foo\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Compile Error (in Resolver): @(line: 1, col: 6): Attempting to GOTO to undeclared label: foo"
    );

    let err = compiler::compile("IF 1 ! 2 THEN\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Compile Error (in Tokenizer): @(line: 1, col: 6): Expected !=, got ! "
    );
}

#[test]
fn compilations_are_independent() {
    compile_ok("LET x = 1\nLABEL a\n");
    // Neither `x` nor `a` leak into the next compilation.
    assert!(compiler::compile("PRINT x\n").is_err());
    compile_ok("LABEL a\n");
}
