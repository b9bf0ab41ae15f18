use criterion::{black_box, criterion_group, criterion_main, Criterion};
use layec_lex::{Lexer, Mode, TokenKind};
use layec_util::{Context, DiagSink};

fn c_source() -> String {
    let unit = "\
static int accumulate(int const* values, int count) {\n\
    int total = 0;\n\
    for (int i = 0; i < count; i++) {\n\
        total += values[i]; /* running sum */\n\
    }\n\
    return total;\n\
}\n";
    unit.repeat(64)
}

fn laye_source() -> String {
    let unit = "\
int accumulate(int[] values, int count) {\n\
    var total = 0;\n\
    for (var i = 0; i < count; i = i + 1) {\n\
        total = total + values[i]; /* running /* nested */ sum */\n\
    }\n\
    return total;\n\
}\n";
    unit.repeat(64)
}

fn count_tokens(text: &str, mode: Mode) -> usize {
    let context = Context::new(DiagSink::silent());
    let id = context.add_source("bench", text, false);
    let mut lexer = Lexer::new(&context, id, mode);
    let mut count = 0;
    while lexer.read_pp_token().kind != TokenKind::EndOfFile {
        count += 1;
    }
    count
}

fn bench_lex_c(c: &mut Criterion) {
    let source = c_source();
    c.bench_function("lex_c_unit", |b| {
        b.iter(|| black_box(count_tokens(&source, Mode::C)))
    });
}

fn bench_lex_laye(c: &mut Criterion) {
    let source = laye_source();
    c.bench_function("lex_laye_unit", |b| {
        b.iter(|| black_box(count_tokens(&source, Mode::LAYE)))
    });
}

criterion_group!(benches, bench_lex_c, bench_lex_laye);
criterion_main!(benches);
