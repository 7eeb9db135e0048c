use darwinbots::*;

fn exp(src: &str) -> f64 {
    let mut parser = Parser::new(src);
    let node = parser.parse_exp().unwrap_or_else(|e| panic!("{}", e));
    node.execute(&Sysvars::new())
}

#[test]
fn order_of_operations() {
    let cases = [
        ("2 - 3 - 5", 4.0),
        ("2 - (3 - 5)", 4.0),
        ("(2-3)-5", -6.0),
        ("2 / -1 / 2", -4.0),
        ("2 / (3 - 4) / 2", -4.0),
        ("2^3^2", 512.0),
        ("(2^3)^2", 64.0),
        ("1 + 2 * 3", 7.0),
        ("(1 + 2) * 3", 9.0),
        ("-2^2", 4.0),
        ("2 * -3", -6.0),
        ("--4", 4.0),
        (".5 + 5.", 5.5),
    ];
    for (src, want) in cases {
        assert_eq!(exp(src), want, "evaluating {}", src);
    }
}

#[test]
fn subtraction_nests_to_the_right() {
    let node = Parser::new("2 - 3 - 5").parse_exp().unwrap();
    assert_eq!(node.to_string(), "SUB_EXPR(Literal(2), SUB_EXPR(Literal(3), Literal(5)))");
}

#[test]
fn literals() {
    assert_eq!(Parser::new("94.234").parse_literal().unwrap(), Exp::Literal(94.234));
    assert_eq!(Parser::new("  7").parse_literal().unwrap(), Exp::Literal(7.0));
    assert!(Parser::new("394Ab").parse_literal().is_err());
    assert!(Parser::new("abc").parse_literal().is_err());

    let mut parser = Parser::new(".");
    let err = parser.parse_literal().unwrap_err();
    assert_eq!(err.message, "Expected valid number");
    assert_eq!(parser.source().cursor, 0);
}

#[test]
fn variables() {
    assert_eq!(Parser::new("Eye1").parse_variable().unwrap().name, "Eye1");
    assert_eq!(Parser::new("eye1dir2").parse_variable().unwrap().name, "eye1dir2");
    assert!(Parser::new("1Eye").parse_variable().is_err());
}

#[test]
fn keywords_are_not_variables() {
    for word in ["cond", "and", "or", "start", "stop", "end"] {
        let mut parser = Parser::new(word);
        let err = parser.parse_variable().unwrap_err();
        assert_eq!(err.message, format!("Unexpected keyword {}", word));
        assert_eq!(parser.source().cursor, 0);
    }
    assert!(Parser::new("stop <- 5").parse_body_exp().is_err());
    //only whole words are reserved
    assert_eq!(Parser::new("order").parse_variable().unwrap().name, "order");
    assert_eq!(Parser::new("endurance").parse_variable().unwrap().name, "endurance");
}

#[test]
fn keywords_glued_to_digits_are_not_keywords() {
    let err = compile_source("cond1 = 1 start p <- 1 stop end").unwrap_err();
    assert_eq!(err.message, "Expected to find cond");
    let err = compile_source("cond 1 = 1 start2 p <- 1 stop end").unwrap_err();
    assert_eq!(err.message, "Expected to find boolean operation");
}

#[test]
fn group_falls_back_to_variable() {
    assert_eq!(Parser::new("eye5").parse_group().unwrap(), Exp::var("eye5"));
    assert_eq!(Parser::new("5").parse_group().unwrap(), Exp::Literal(5.0));
    assert!(Parser::new("5eye").parse_group().is_err());
}

#[test]
fn body_expression() {
    let stmt = Parser::new("p <- 5 * q").parse_body_exp().unwrap();
    assert_eq!(stmt.variable.name, "p");
    assert_eq!(stmt.to_string(), "BodyExpression: Variable(p) <- MUL_EXPR(Literal(5), Variable(q))");
    assert!(Parser::new("p = 5").parse_body_exp().is_err());
    assert!(Parser::new("5 <- p").parse_body_exp().is_err());
}

#[test]
fn bool_terms() {
    let ops = [
        ("1 = 1", "E_COND_EXPR"),
        ("1 != 1", "NE_COND_EXPR"),
        ("1 > 1", "G_COND_EXPR"),
        ("1 < 1", "L_COND_EXPR"),
        ("1 >= 1", "GE_COND_EXPR"),
        ("1 <= 1", "LE_COND_EXPR"),
    ];
    for (src, tag) in ops {
        let node = Parser::new(src).parse_bool_term().unwrap();
        assert_eq!(node.to_string(), format!("{}(Literal(1), Literal(1))", tag));
    }
    assert!(Parser::new("1 + 1").parse_bool_term().is_err());
}

#[test]
fn phrases_nest_to_the_right() {
    let node = Parser::new("1 = 1 and 2 = 2 and 3 = 3").parse_cond_exp().unwrap();
    assert!(matches!(&node, BExp::And(_, rhs) if matches!(**rhs, BExp::And(..))));

    //or binds tighter than and
    let node = Parser::new("1 = 2 or 2 = 2 and 3 = 4").parse_cond_exp().unwrap();
    assert!(matches!(&node, BExp::And(lhs, _) if matches!(**lhs, BExp::Or(..))));
    assert!(!node.execute(&Sysvars::new()));
}

#[test]
fn parenthesised_phrases() {
    let node = Parser::new("(1 = 2 and 2 = 2) or 3 = 3").parse_cond_exp().unwrap();
    assert!(matches!(node, BExp::Or(..)));
    assert!(node.execute(&Sysvars::new()));
    assert!(Parser::new("(1 = 2 and 2 = 2 or 3 = 3").parse_cond_exp().is_err());
}

#[test]
fn genes() {
    assert!(Parser::new("start p <- 5 stop").parse_gene().is_err());
    assert!(Parser::new("cond 2 < 3 p <- 5 stop").parse_gene().is_err());
    assert!(Parser::new("cond 2 < 3 start p <- 5").parse_gene().is_err());

    let empty = Parser::new("cond start stop").parse_gene().unwrap();
    assert_eq!(empty.cond, BExp::Empty);
    assert!(empty.body.is_empty());

    let gene = Parser::new("cond 3 > 2 2 != 1 start p <- 5 a <- p stop").parse_gene().unwrap();
    assert!(matches!(gene.cond, BExp::And(..)));
    let mut vars = Sysvars::new();
    gene.execute(&mut vars);
    assert_eq!(vars.get("p"), 5.0);
    assert_eq!(vars.get("a"), 5.0);
}

#[test]
fn gene_pretty_print() {
    let gene = Parser::new("cond start p <- 5 stop").parse_gene().unwrap();
    assert_eq!(
        gene.to_string(),
        "Gene(\n  Cond(\n    EmptyCond()\n  )\n  Body(\n    BodyExpression: Variable(p) <- Literal(5)\n  )\n)"
    );
}

#[test]
fn errors_point_at_the_problem() {
    let err = compile_source("cond 1 = 1\nstart\n  p <- 5 +\nstop\nend").unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(err.column, 1);
    assert_eq!(err.to_string(), "Error on line 4 : 1\nstop\n^\nUnexpected keyword stop");

    let err = compile_source("cond 1 = 1 start\n  p <- 5\n  q <- $\nstop end").unwrap_err();
    assert_eq!((err.line, err.column), (3, 8));
    assert!(err.to_string().starts_with("Error on line 3 : 8\n  q <- $\n       ^\n"));
}

#[test]
fn unclosed_parenthesis_in_gene_body() {
    for src in ["cond start p <- (5 + 3 stop end", "cond start p <- ((5) stop end"] {
        let err = compile_source(src).unwrap_err();
        assert_eq!(err.message, "Unclosed parenthesis in gene body", "compiling {}", src);
    }
    let err = compile_source("cond start p <- (5 q <- 1 stop end").unwrap_err();
    assert_eq!(err.message, "Expected to find )");
    assert!(compile_source("cond start p <- ((5) + 1) stop end").is_ok());
}

#[test]
fn end_inside_a_gene() {
    let err = compile_source("cond start p <- 5 end").unwrap_err();
    assert_eq!(err.message, "Expected to find stop before end of dna");
}

#[test]
fn comments_keep_positions() {
    let src = "' a bot\ncond 1 = 1 ' always\nstart\n  p <- ' oops\nstop\nend";
    let err = compile_source(src).unwrap_err();
    assert_eq!(err.line, 5);
    assert!(compile_source("' header\ncond start p <- 1 stop ' trailing\nend ' done").is_ok());
}
