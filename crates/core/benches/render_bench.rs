use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use inkdown_core::{RenderOptions, render, render_to_writer};
use std::hint::black_box;
use std::io::{self, Write};

// A dummy writer that discards data, similar to /dev/null
struct NullWriter;
impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn generate_large_markdown() -> String {
    let mut s = String::with_capacity(400_000);
    s.push_str("# Benchmark Document\n\n");
    for i in 0..2_000 {
        s.push_str(&format!("## Section {i}\n\n"));
        s.push_str("Paragraph with **bold**, _italic_ and `inline` text.\n\n");
        s.push_str("- first item\n- second [link](https://example.com)\n\n");
        s.push_str("```c\nint main(void) { /* entry */ return 0; }\n```\n\n");
    }
    s
}

fn benchmark_pipeline(c: &mut Criterion) {
    let input = generate_large_markdown();
    let options = RenderOptions::default();
    let mut group = c.benchmark_group("pipeline_throughput");

    // Calculate throughput in bytes per second
    group.throughput(Throughput::Bytes(input.len() as u64));

    // 1. Stream the highlight pass straight into the writer
    group.bench_function("streaming_highlight", |b| {
        b.iter(|| {
            render_to_writer(black_box(&input), &options, NullWriter).unwrap();
        })
    });

    // 2. Highlight into a String, then write it
    group.bench_function("buffering_string", |b| {
        b.iter(|| {
            let rendered = render(black_box(&input), &options).unwrap();
            let mut writer = NullWriter;
            writer.write_all(rendered.html.as_bytes()).unwrap();
        })
    });

    // 3. Markdown passes only
    group.bench_function("parse_only", |b| {
        b.iter(|| inkdown_core::parse(black_box(&input)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_pipeline);
criterion_main!(benches);
