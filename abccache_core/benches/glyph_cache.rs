//! Benchmarks for the metrics hook paths.
//!
//! Models what a debugger's disassembly view does on every repaint: one
//! `GetCharABCWidthsI` per visible run of text, mostly on an already cached
//! font. Batch sizes chosen to match real usage:
//!
//! - **1**: single glyph probes (caret, column measurement).
//! - **16**: short tokens (mnemonics, registers).
//! - **96**: a full printable-ASCII line.

use std::cell::Cell;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use abccache_core::{Abc, FontHandle, GlyphQuery, HookContext, ObjectHandle, SurfaceHandle};
use abccache_core::Gdi;

const BATCHES: [usize; 3] = [1, 16, 96];

const OWNER: u32 = 1;
const OTHER: u32 = 2;
const DC: SurfaceHandle = SurfaceHandle(0x10);

/// Constant-time stand-in for gdi32.
struct StubGdi {
    calls: Cell<u64>,
}

impl Gdi for StubGdi {
    fn current_font(&self, _surface: SurfaceHandle) -> FontHandle {
        FontHandle(0xA0)
    }

    fn as_font(&self, object: ObjectHandle) -> Option<FontHandle> {
        Some(FontHandle(object.0))
    }

    fn char_abc_widths(
        &self,
        _surface: SurfaceHandle,
        query: &GlyphQuery<'_>,
        out: &mut [Abc],
    ) -> bool {
        self.calls.set(self.calls.get() + 1);
        for (position, slot) in out.iter_mut().enumerate() {
            *slot = Abc::new(0, query.glyph(position), 1);
        }
        true
    }
}

fn bench_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit");
    for &n in &BATCHES {
        let ctx = HookContext::default();
        let gdi = StubGdi { calls: Cell::new(0) };
        let mut out = vec![Abc::default(); n];
        ctx.char_abc_widths(&gdi, OWNER, DC, GlyphQuery::range(32), &mut out);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                ctx.char_abc_widths(&gdi, OWNER, DC, black_box(GlyphQuery::range(32)), &mut out)
            });
        });
    }
    group.finish();
}

fn bench_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("miss");
    for &n in &BATCHES {
        let ctx = HookContext::default();
        let gdi = StubGdi { calls: Cell::new(0) };
        let mut out = vec![Abc::default(); n];
        let mut first = 0_u32;

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                // Fresh glyph range every iteration so nothing is cached.
                first = first.wrapping_add(n as u32);
                ctx.char_abc_widths(&gdi, OWNER, DC, GlyphQuery::range(first), &mut out)
            });
        });
    }
    group.finish();
}

fn bench_passthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("passthrough");
    for &n in &BATCHES {
        let ctx = HookContext::default();
        let gdi = StubGdi { calls: Cell::new(0) };
        let mut out = vec![Abc::default(); n];
        ctx.char_abc_widths(&gdi, OWNER, DC, GlyphQuery::range(32), &mut out);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                ctx.char_abc_widths(&gdi, OTHER, DC, black_box(GlyphQuery::range(32)), &mut out)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit, bench_miss, bench_passthrough);
criterion_main!(benches);
