#[cfg(test)]
mod parser_tests {
    use pretty_assertions::assert_eq;

    use rox::ast_printer::AstPrinter;
    use rox::expr::Expr;
    use rox::parser::Parser;
    use rox::scanner::Scanner;
    use rox::stmt::Stmt;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<String>> {
        let (tokens, errors) = Scanner::new(source.as_bytes()).scan_all();
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);

        Parser::new(tokens)
            .parse()
            .map_err(|errors| errors.iter().map(|e| e.to_string()).collect())
    }

    fn printed(source: &str) -> Vec<String> {
        let statements = parse(source).expect("source should parse");
        statements
            .iter()
            .map(|stmt| AstPrinter.print_stmt(stmt))
            .collect()
    }

    fn expression(source: &str) -> Result<Expr, String> {
        let (tokens, _) = Scanner::new(source.as_bytes()).scan_all();
        Parser::new(tokens).parse_expression().map_err(|e| e.to_string())
    }

    #[test]
    fn test_precedence_and_grouping() {
        let expr = expression("-1 + 2 * (3 - 4) >= 5 == !true").expect("should parse");

        assert_eq!(
            AstPrinter.print_expr(&expr),
            "(== (>= (+ (- 1.0) (* 2.0 (group (- 3.0 4.0)))) 5.0) (! true))"
        );
    }

    #[test]
    fn test_logical_operators_bind_looser_than_equality() {
        let expr = expression("a or b and c == nil").expect("should parse");

        assert_eq!(AstPrinter.print_expr(&expr), "(or a (and b (== c nil)))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1.5;"), ["(; (= a (= b 1.5)))"]);
    }

    #[test]
    fn test_for_loop_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            ["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
        );
    }

    #[test]
    fn test_empty_for_clauses_loop_forever() {
        assert_eq!(printed("for (;;) print 1;"), ["(while true (print 1.0))"]);
    }

    #[test]
    fn test_if_else_and_blocks() {
        assert_eq!(
            printed("if (x) { var y; } else print \"no\";"),
            ["(if-else x (block (var y)) (print no))"]
        );
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            printed("fun add(a, b) { return a + b; } fun noop() { return; }"),
            [
                "(fun add (a b) (return (+ a b)))",
                "(fun noop () (return))",
            ]
        );
    }

    #[test]
    fn test_class_with_superclass() {
        let statements =
            parse("class B < A { init(x) { this.x = x; } m() { return super.m(); } }")
                .expect("should parse");

        assert_eq!(statements.len(), 1);
        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &statements[0]
        else {
            panic!("expected a class declaration");
        };

        assert_eq!(name.lexeme, "B");
        assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));
        assert_eq!(methods.len(), 2);

        assert_eq!(
            AstPrinter.print_stmt(&statements[0]),
            "(class B < A (fun init (x) (; (= (. this x) x))) (fun m () (return (call (super m)))))"
        );
    }

    #[test]
    fn test_call_chains_and_properties() {
        assert_eq!(
            printed("a.b(1, 2).c = d();"),
            ["(; (= (. (call (. a b) 1.0 2.0) c) (call d)))"]
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(
            parse("1 + 2 = 3;").err(),
            Some(vec!["[line 1] Error at '=': Invalid assignment target".to_string()])
        );
    }

    #[test]
    fn test_errors_are_collected_after_synchronizing() {
        let errors = parse("var = 1;\nprint (2;\nprint 3;").expect_err("should fail");

        assert_eq!(
            errors,
            [
                "[line 1] Error at '=': Expected variable name",
                "[line 2] Error at ';': Expected ')' after expression",
            ]
        );
    }

    #[test]
    fn test_error_inside_block_is_recovered_within_the_block() {
        let errors = parse("{\n  var a = ;\n  print 1;\n}\nprint 2;\n").expect_err("should fail");

        assert_eq!(errors, ["[line 2] Error at ';': Expected expression"]);
    }

    #[test]
    fn test_error_inside_nested_block_and_method_body() {
        let errors = parse("{\n  {\n    print ;\n  }\n  print 1;\n}\n").expect_err("should fail");
        assert_eq!(errors, ["[line 3] Error at ';': Expected expression"]);

        let errors = parse("class A {\n  m() {\n    var = 1;\n  }\n  n() {}\n}\nprint A;")
            .expect_err("should fail");
        assert_eq!(errors, ["[line 3] Error at '=': Expected variable name"]);
    }

    #[test]
    fn test_invalid_assignment_target_keeps_parsing() {
        let results: Vec<_> = Parser::new(Scanner::new(b"a + b = c;\nprint 1;").scan_all().0).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().err().map(|e| e.to_string()).as_deref(),
            Some("[line 1] Error at '=': Invalid assignment target")
        );
        assert!(matches!(results[1], Ok(Stmt::Expression(Expr::Binary { .. }))));
        assert!(matches!(results[2], Ok(Stmt::Print { .. })));
    }

    #[test]
    fn test_too_many_arguments_is_reported_once() {
        let arguments = vec!["1"; 256].join(", ");
        let errors = parse(&format!("f({});\nprint 2;", arguments)).expect_err("should fail");

        assert_eq!(errors, ["[line 1] Error at '1': Can't have more than 255 arguments"]);
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        assert_eq!(
            parse("print 1").err(),
            Some(vec!["[line 1] Error at end: Expected ';' after value".to_string()])
        );
    }

    #[test]
    fn test_parse_expression_rejects_trailing_tokens() {
        assert_eq!(
            expression("1 2").err().as_deref(),
            Some("[line 1] Error at '2': Expected end of expression")
        );
    }

    #[test]
    fn test_each_variable_reference_gets_its_own_id() {
        let statements = parse("a; a;").expect("should parse");

        let ids: Vec<_> = statements
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => *id,
                other => panic!("unexpected statement {:?}", other),
            })
            .collect();

        assert_ne!(ids[0], ids[1]);
    }
}
