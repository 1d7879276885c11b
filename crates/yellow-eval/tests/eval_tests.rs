//! Integration tests for the Yellow tree-walking evaluator.
//!
//! Tests key evaluator features:
//! - bindings, scenes and acts
//! - loops, conditionals and the runaway-loop breaker
//! - arithmetic, strings and comparisons
//! - superposition, fragments and drift
//! - whisper refusals and inline execution
//! - recursion and step limits

use yellow_eval::{
    EngineConfig, Evaluator, ExecutionBudget, OutputBuffer, RuntimeError, Session, Value,
};
use yellow_types::ErrorCode;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Everything one program run leaves behind.
struct Run {
    output: OutputBuffer,
    result: Result<(), RuntimeError>,
    session: Session,
    steps: u64,
}

impl Run {
    fn text(&self) -> String {
        self.output.lines().join("\n")
    }

    fn global(&self, name: &str) -> Option<&Value> {
        self.session.env.global_bindings().get(name)
    }

    fn error_code(&self) -> ErrorCode {
        match &self.result {
            Ok(()) => panic!("expected a runtime error, output was:\n{}", self.text()),
            Err(e) => e.code(),
        }
    }
}

/// Parse and execute `source` with the given config and seed 7.
fn run_with(config: &EngineConfig, source: &str) -> Run {
    init_tracing();
    let stmts = match yellow_parser::parse(source) {
        Ok(stmts) => stmts,
        Err(e) => panic!("parse error in test source: {e}"),
    };
    let mut session = Session::new(config, 7);
    let mut budget = ExecutionBudget::new(config.max_depth, config.max_steps);
    let mut evaluator = Evaluator::new(&mut session, &mut budget, config);
    let result = evaluator.execute(&stmts);
    let output = evaluator.finish();
    Run {
        output,
        result,
        session,
        steps: budget.steps(),
    }
}

fn run(source: &str) -> Run {
    run_with(&EngineConfig::default(), source)
}

/// Run a program that must succeed and return its output.
fn output_of(source: &str) -> String {
    let run = run(source);
    if let Err(e) = &run.result {
        panic!("unexpected runtime error: {e}");
    }
    run.text()
}

fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Bindings and output
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_mask_and_echo() {
    let run = run("mask truth -> 42; echo(truth);");
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "42");
    assert!((run.session.stability - (100.0 - 2.0 * 0.08)).abs() < 1e-9);
    assert_eq!(run.session.entropy.now(), 2);
}

#[test]
fn test_mask_rebinds() {
    assert_eq!(output_of("mask x = 1; mask x -> x + 1; echo(x);"), "2");
}

#[test]
fn test_literal_rendering() {
    assert_eq!(
        output_of("echo(yellow); echo(tattered); echo(pallid); echo(2.5); echo(\"king\");"),
        "yellow\ntattered\npallid\n2.5\nking"
    );
}

#[test]
fn test_unbound_identifier() {
    let run = run("echo(1); echo(ghost); echo(2);");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
    // output before the failure is kept
    assert_eq!(run.text(), "1");
}

#[test]
fn test_scene_scoping() {
    let out = output_of("mask x -> 1; scene { mask x -> 2; mask y -> 3; echo(x); } echo(x);");
    assert_eq!(out, "2\n1");

    let run = run("scene { mask inner -> 1; } echo(inner);");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_hastur_counts() {
    let out = output_of("mask i -> 0; hastur (i < 3) { echo(i); mask i -> i + 1; }");
    assert_eq!(out, "0\n1\n2");
}

#[test]
fn test_runaway_hastur_is_broken_off() {
    let config = EngineConfig {
        max_loop_iterations: 5,
        ..EngineConfig::default()
    };
    let run = run_with(
        &config,
        "mask n -> 0; hastur (yellow) { mask n -> n + 1; } echo(n);",
    );
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "⚠ Hastur, Hastur, Hastur!\n5");
    // mask, hastur, five bodies and echo each decay once, every iteration
    // costs extra, and the penalty lands once
    let expected = 100.0 - 8.0 * 0.08 - 5.0 * 0.5 - 20.0;
    assert!((run.session.stability - expected).abs() < 1e-9);
}

#[test]
fn test_hastur_iterations_cost_stability() {
    let run = run("mask i -> 0; hastur (i < 3) { mask i -> i + 1; }");
    assert!(run.result.is_ok());
    let expected = 100.0 - 5.0 * 0.08 - 3.0 * 0.5;
    assert!((run.session.stability - expected).abs() < 1e-9);
}

#[test]
fn test_cassilda() {
    assert_eq!(
        output_of("cassilda (1 < 2) { echo(\"yes\"); } cassilda (2 < 1) { echo(\"no\"); }"),
        "yes"
    );
}

#[test]
fn test_cassilda_body_shares_scope() {
    assert_eq!(output_of("cassilda (yellow) { mask seen -> 1; } echo(seen);"), "1");
}

#[test]
fn test_top_level_carcosa_ends_program() {
    let run = run("echo(1); carcosa; echo(2);");
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "1");
}

// ══════════════════════════════════════════════════════════════════════════════
// Acts
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_act_call_returns() {
    let out = output_of("act add(a, b) { carcosa a + b; } echo(add(2, 3));");
    assert_eq!(out, "5");
}

#[test]
fn test_act_without_carcosa_returns_pallid() {
    assert_eq!(output_of("act noop() { mask x -> 1; } echo(noop());"), "pallid");
}

#[test]
fn test_act_renders_and_params_do_not_leak() {
    let out = output_of("act id(v) { carcosa v; } echo(id); echo(id(9));");
    assert_eq!(out, "<act id>\n9");

    let run = run("act id(v) { carcosa v; } id(1); echo(v);");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
}

#[test]
fn test_carcosa_inside_loop_returns_from_act() {
    let source = "
        act first_over(limit) {
            mask i -> 0;
            hastur (yellow) {
                cassilda (i > limit) { carcosa i; }
                mask i -> i + 1;
            }
        }
        echo(first_over(3));
    ";
    assert_eq!(output_of(source), "4");
}

#[test]
fn test_arity_mismatch() {
    let run = run("act add(a, b) { carcosa a + b; } add(1);");
    assert_eq!(run.error_code(), ErrorCode::ARITY_MISMATCH);
    assert_eq!(
        run.result.unwrap_err().to_string(),
        "act 'add' expects 2 argument(s), got 1"
    );
}

#[test]
fn test_not_callable() {
    let run = run("mask x -> 1; x();");
    assert_eq!(run.error_code(), ErrorCode::NOT_CALLABLE);
}

#[test]
fn test_unbounded_recursion_hits_depth_limit() {
    let run = run("act f(n) { carcosa f(n + 1); } echo(f(0));");
    assert_eq!(
        run.result,
        Err(RuntimeError::RecursionLimitExceeded { limit: 100 })
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(output_of("echo(2 + 3 * 4); echo((2 + 3) * 4); echo(-2 - -3);"), "14\n20\n1");
    assert_eq!(output_of("echo(7 / 2);"), "3.5");
}

#[test]
fn test_comparisons_and_equality() {
    let out = output_of("echo(1 <= 1); echo(2 >= 3); echo(\"a\" == \"a\"); echo(1 != pallid);");
    assert_eq!(out, "yellow\ntattered\nyellow\nyellow");
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        output_of("echo(\"The King\" + \" in \" + \"Yellow\");"),
        "The King in Yellow"
    );
}

#[test]
fn test_string_growth_is_capped() {
    let config = EngineConfig {
        max_string_bytes: 8,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "mask s -> \"ab\"; hastur (yellow) { mask s -> s + s; }");
    assert_eq!(run.result, Err(RuntimeError::StringTooLong { limit: 8 }));
    assert_eq!(run.global("s"), Some(&Value::String("abababab".into())));
}

#[test]
fn test_division_by_zero() {
    let run = run("echo(1 / 0);");
    assert_eq!(run.error_code(), ErrorCode::DIVISION_BY_ZERO);
}

#[test]
fn test_type_mismatches() {
    for source in ["echo(1 + \"a\");", "echo(\"a\" < 1);", "echo(-\"a\");", "echo(yellow * 2);"] {
        let run = run(source);
        assert_eq!(run.error_code(), ErrorCode::TYPE_MISMATCH, "{source}");
    }
}

#[test]
fn test_overflow_is_non_finite() {
    let run = run("mask x -> 10; hastur (yellow) { mask x -> x * x; }");
    assert_eq!(run.error_code(), ErrorCode::NON_FINITE_RESULT);
}

// ══════════════════════════════════════════════════════════════════════════════
// Superposition, fragments, drift
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_superpose_and_collapse() {
    let out = output_of("mask s -> superpose(1, 1, 1); echo(s); echo(collapse(s));");
    assert_eq!(out, "<superposed: 3 possibilities>\n1");
}

#[test]
fn test_collapse_picks_a_candidate() {
    let run = run("mask c -> collapse(superpose(1, 2, 3));");
    let picked = number(run.global("c"));
    assert!([1.0, 2.0, 3.0].contains(&picked));
}

#[test]
fn test_conditions_collapse_superpositions() {
    assert_eq!(
        output_of("cassilda (superpose(yellow, yellow)) { echo(\"taken\"); }"),
        "taken"
    );
}

#[test]
fn test_empty_superposition() {
    let run = run("echo(collapse(superpose()));");
    assert_eq!(run.error_code(), ErrorCode::EMPTY_SUPERPOSITION);
}

#[test]
fn test_remember_forget_manifest() {
    let source = "
        mask x -> 1;
        remember x;
        mask x -> 2;
        remember x;
        forget x;
        echo(manifest(x));
        echo(manifest(x));
        echo(manifest(x));
    ";
    assert_eq!(
        output_of(source),
        "Forgotten: x... but fragments remain\n2\n1\npallid"
    );
}

#[test]
fn test_forget_unbinds() {
    let run = run("mask x -> 1; forget x; echo(x);");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
    assert_eq!(run.text(), "Forgotten: x... but fragments remain");
}

#[test]
fn test_remember_keeps_bounded_history() {
    let config = EngineConfig {
        max_fragments: 3,
        ..EngineConfig::default()
    };
    let run = run_with(
        &config,
        "mask i -> 0; hastur (i < 5) { remember i; mask i -> i + 1; }",
    );
    assert!(run.result.is_ok());
    assert_eq!(run.session.fragments.count("i"), 3);
}

#[test]
fn test_remember_unbound_name() {
    let run = run("remember ghost;");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
}

#[test]
fn test_rewrite_statement_drifts_numbers() {
    let run = run("mask x -> 10; rewrite x;");
    // near-full stability: the drift term is tiny, leaving the -7.5 shift
    let x = number(run.global("x"));
    assert!((x - 2.5).abs() < 0.01, "x = {x}");
}

#[test]
fn test_rewrite_expression_leaves_strings() {
    assert_eq!(output_of("echo(rewrite(\"carcosa\"));"), "carcosa");
}

#[test]
fn test_rewrite_frays_on_tenth_tick() {
    let source = format!("mask x -> 1;{}rewrite x;", " mask y -> 1;".repeat(8));
    let run = run(&source);
    assert!(run.result.is_ok());
    assert_eq!(run.session.entropy.now(), 10);
    assert_eq!(run.text(), "⚠ Reality frays...");
    let expected = 100.0 - 10.0 * 0.08 - 2.0;
    assert!((run.session.stability - expected).abs() < 1e-9);

    // any other tick leaves reality intact
    assert_eq!(output_of("mask x -> 1; rewrite x;"), "");
}

#[test]
fn test_nested_superpositions_flatten() {
    let run = run("mask s -> superpose(superpose(1, 2), superpose(3, 4), 5); echo(s);");
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "<superposed: 3 possibilities>");
    match run.global("s") {
        Some(Value::Superposition(items)) => {
            assert!(items.iter().all(|v| matches!(v, Value::Number(_))));
        }
        other => panic!("expected a superposition, got {other:?}"),
    }
}

#[test]
fn test_self_feeding_superposition_stays_small() {
    let run = run(
        "mask s -> superpose(1, 2); mask i -> 0;
         hastur (i < 60) { mask s -> superpose(s, s); mask i -> i + 1; }
         echo(s);",
    );
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "<superposed: 2 possibilities>");
}

// ══════════════════════════════════════════════════════════════════════════════
// Contagion, rifts and entanglement
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_infect_corrupts_reads_not_bindings() {
    let run = run("mask x -> 10; infect x; mask y -> x;");
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "⚠ Variable 'x' infected. Contagion spreads...");
    assert!(run.session.infections.is_infected("x"));
    assert_eq!(run.global("x"), Some(&Value::Number(10.0)));
    // near-full stability keeps virulence close to one half
    let y = number(run.global("y"));
    assert!((7.5..=12.5).contains(&y), "y = {y}");

    let expected = 100.0 - 3.0 * 0.08 - 3.0;
    assert!((run.session.stability - expected).abs() < 1e-9);
}

#[test]
fn test_infection_spreads_within_scope() {
    let names: Vec<String> = (0..20).map(|i| format!("n{i:02}")).collect();
    let masks: String = names.iter().map(|n| format!("mask {n} -> 1; ")).collect();
    let source = format!("mask outer -> 1; scene {{ {masks} infect n00; }}");
    let run = run(&source);
    assert!(run.result.is_ok());

    let lines = run.output.lines();
    assert_eq!(lines[0], "⚠ Variable 'n00' infected. Contagion spreads...");
    let spread: Vec<&str> = lines[1..]
        .iter()
        .map(|line| {
            line.strip_prefix("  ↳ Infection spreads to '")
                .and_then(|rest| rest.strip_suffix('\''))
                .unwrap_or_else(|| panic!("unexpected line {line:?}"))
        })
        .collect();
    assert_eq!(run.session.infections.len(), 1 + spread.len());
    for name in &spread {
        assert!(run.session.infections.virulence(name) < run.session.infections.virulence("n00"));
    }
    assert!(!run.session.infections.is_infected("outer"));
}

#[test]
fn test_infect_unbound_name() {
    let run = run("infect ghost;");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
    assert!(run.session.infections.is_empty());
}

#[test]
fn test_rift_loop_draws_its_length() {
    let run = run("mask n -> 0; rift (n < 100) { mask n -> n + 1; } echo(n);");
    assert!(run.result.is_ok());
    let lines = run.output.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "⚠ Non-Euclidean loop: space folds upon itself");
    let completed: f64 = lines[1]
        .strip_prefix("⚠ Rift loop completed ")
        .and_then(|rest| rest.strip_suffix(" iterations"))
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("unexpected line {:?}", lines[1]));
    assert!((1.0..=9.0).contains(&completed));
    assert_eq!(number(run.global("n")), completed);
    assert_eq!(lines[2], completed.to_string());
}

#[test]
fn test_rift_loop_respects_condition_while_stable() {
    assert_eq!(
        output_of("rift (tattered) { echo(1); }"),
        "⚠ Non-Euclidean loop: space folds upon itself\n⚠ Rift loop completed 0 iterations"
    );
}

#[test]
fn test_unmoored_rift_ignores_condition() {
    let config = EngineConfig {
        initial_stability: 25.0,
        rift_iteration_cost: 0.0,
        phantom_chance: 0.0,
        ..EngineConfig::default()
    };
    let source = format!(
        "mask c -> 0; {}",
        "rift (tattered) { mask c -> c + 1; } ".repeat(10)
    );
    let run = run_with(&config, &source);
    assert!(run.result.is_ok());
    assert!(number(run.global("c")) > 0.0);
}

#[test]
fn test_carcosa_escapes_rift() {
    let source = "
        act find() {
            rift (yellow) { carcosa \"found\"; }
            carcosa \"lost\";
        }
        echo(find());
    ";
    assert_eq!(
        output_of(source),
        "⚠ Non-Euclidean loop: space folds upon itself\nfound"
    );
}

#[test]
fn test_rift_expression() {
    let run = run("mask r -> rift(2 + 3); echo(r);");
    assert!(run.result.is_ok());
    assert_eq!(run.text(), "⚠ Non-Euclidean expression\n5");
    let expected = 100.0 - 2.0 * 0.08 - 2.0;
    assert!((run.session.stability - expected).abs() < 1e-9);
}

#[test]
fn test_entangle_follows_partner() {
    let source = "
        mask b -> 3;
        mask got -> entangle(a, b);
        echo(a);
        echo(collapse(a));
        mask b -> 4;
        echo(collapse(a));
        forget b;
        echo(collapse(a));
    ";
    let run = run(source);
    assert!(run.result.is_ok());
    assert_eq!(
        run.text(),
        "⟨⟩ Entangling 'a' with 'b'\n<entangled with b>\n3\n4\nForgotten: b... but fragments remain\npallid"
    );
    assert_eq!(run.global("got"), Some(&Value::Number(3.0)));
    assert_eq!(run.global("a"), Some(&Value::Entangled("b".into())));
}

#[test]
fn test_entangle_with_unbound_partner() {
    let run = run("echo(entangle(a, nobody)); echo(a);");
    assert_eq!(run.error_code(), ErrorCode::UNBOUND_IDENTIFIER);
    assert_eq!(run.text(), "⟨⟩ Entangling 'a' with 'nobody'\npallid");
}

#[test]
fn test_entangled_superposition_collapses_through() {
    let run = run("mask s -> superpose(1, 2); entangle(e, s); mask c -> collapse(e);");
    let c = number(run.global("c"));
    assert!(c == 1.0 || c == 2.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Stability
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_anchor_restores_stability() {
    let config = EngineConfig {
        initial_stability: 50.0,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "anchor;");
    assert!((run.session.stability - (50.0 - 0.08 + 10.0)).abs() < 1e-9);
    assert_eq!(run.text(), "Reality temporarily stabilized");

    let run = run_with(&EngineConfig::default(), "anchor;");
    assert_eq!(run.session.stability, 100.0);
}

#[test]
fn test_echo_voice_follows_stability() {
    let uneasy = EngineConfig {
        initial_stability: 40.0,
        ..EngineConfig::default()
    };
    assert_eq!(run_with(&uneasy, "echo(1);").text(), "Echo: 1");

    let dread = EngineConfig {
        initial_stability: 10.0,
        phantom_chance: 0.0,
        ..EngineConfig::default()
    };
    let text = run_with(&dread, "echo(\"the yellow sign\");").text();
    assert!(text.starts_with("𝔈𝔠𝔥𝔬: "), "{text}");
    assert_eq!(
        text.trim_start_matches("𝔈𝔠𝔥𝔬: ").chars().count(),
        "the yellow sign".chars().count()
    );
}

#[test]
fn test_phantoms_replace_values_under_low_stability() {
    let config = EngineConfig {
        initial_stability: 10.0,
        phantom_chance: 1.0,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "mask p -> 1;");
    assert!(matches!(run.global("p"), Some(Value::Phantom(_))));

    // phantoms absorb arithmetic instead of failing
    let run = run_with(&config, "mask p -> 1; mask q -> p + \"text\";");
    assert!(run.result.is_ok());
    assert!(matches!(run.global("q"), Some(Value::Phantom(_))));
}

#[test]
fn test_depleted_stability_aborts() {
    let config = EngineConfig {
        initial_stability: 0.0,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "echo(1);");
    assert_eq!(run.result, Err(RuntimeError::StabilityDepleted));
    assert_eq!(run.steps, 0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Whisper
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_whisper_runs_inline() {
    let run = run("whisper \"mask w -> 7; echo(w);\"; echo(w);");
    assert!(run.result.is_ok());
    assert_eq!(
        run.text(),
        "◈ Whisper manifests: mask w -> 7; echo(w);\n7\n7"
    );
    // four statements decay once each, plus the whisper cost
    let expected = 100.0 - 4.0 * 0.08 - 5.0;
    assert!((run.session.stability - expected).abs() < 1e-9);
}

#[test]
fn test_whisper_refusals() {
    assert_eq!(
        output_of("whisper \"mask system -> 1;\";"),
        "⚠ Forbidden incantation 'system' detected."
    );
    assert_eq!(
        output_of("whisper \"echo(CARCOSA);\";"),
        "⚠ Forbidden incantation 'carcosa' detected."
    );
    assert_eq!(
        output_of("whisper \"mask x -> 1; infect x;\";"),
        "⚠ Forbidden incantation 'infect' detected."
    );
    assert!(output_of("whisper \"echo(\";").starts_with("⚠ Whisper fails to manifest: "));
    assert_eq!(
        output_of(&format!("whisper \"{}\";", "echo(1);".repeat(11))),
        "⚠ Whisper too complex."
    );
    assert_eq!(
        output_of(&format!("whisper \"{}\";", "anchor; ".repeat(200))),
        "⚠ Whisper exceeds maximum length."
    );
}

#[test]
fn test_whisper_refusal_costs_nothing() {
    let run = run("whisper \"echo(\";");
    assert!((run.session.stability - (100.0 - 0.08)).abs() < 1e-9);
}

#[test]
fn test_whisper_limit_per_run() {
    let run = run(&"whisper \"anchor;\";".repeat(11));
    assert!(run.result.is_ok());
    let lines = run.output.lines();
    // ten accepted whispers each announce themselves and their anchor
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[19], "Reality temporarily stabilized");
    assert_eq!(lines[20], "⚠ Whisper limit exceeded.");
}

// ══════════════════════════════════════════════════════════════════════════════
// Limits
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_deep_parens_hit_recursion_limit() {
    let source = format!("{}1{};", "(".repeat(110), ")".repeat(110));
    let run = run(&source);
    assert_eq!(
        run.result,
        Err(RuntimeError::RecursionLimitExceeded { limit: 100 })
    );
    // the aborted statement was still charged once
    assert!((run.session.stability - (100.0 - 0.08)).abs() < 1e-9);
}

#[test]
fn test_step_limit() {
    let config = EngineConfig {
        max_steps: 50,
        max_loop_iterations: 1000,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "hastur (yellow) { anchor; }");
    assert_eq!(run.result, Err(RuntimeError::StepLimitExceeded { limit: 50 }));
    assert_eq!(run.steps, 51);
}

#[test]
fn test_output_is_capped() {
    let config = EngineConfig {
        max_output_bytes: 10,
        ..EngineConfig::default()
    };
    let run = run_with(&config, "echo(\"aaaa\"); echo(\"bbbb\"); echo(\"cccc\");");
    assert!(run.result.is_ok());
    assert!(run.output.is_truncated());
    assert_eq!(run.text(), "aaaa\nbbbb");
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_same_run() {
    let source = "
        mask i -> 0;
        hastur (i < 20) {
            echo(collapse(superpose(1, 2, 3, 4)));
            mask i -> i + 1;
        }
        mask x -> 3;
        rewrite x;
        echo(x);
    ";
    let first = run(source).text();
    for _ in 0..100 {
        assert_eq!(run(source).text(), first);
    }
}
