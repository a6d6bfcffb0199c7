use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use presto_client::json::JsonStream;

fn sample_reply(rows: usize) -> Vec<u8> {
    let mut body = String::new();
    body.push_str(r#"{"id":"20160128_214710_00012_rk68b","infoUri":"http://coordinator:8080/query.html?20160128_214710_00012_rk68b","#);
    body.push_str(r#""nextUri":"http://coordinator:8080/v1/statement/20160128_214710_00012_rk68b/2","#);
    body.push_str(r#""columns":[{"name":"id","type":"bigint"},{"name":"name","type":"varchar"},{"name":"active","type":"boolean"}],"#);
    body.push_str(r#""data":["#);
    for i in 0..rows {
        if i > 0 {
            body.push(',');
        }
        body.push_str(&format!(r#"[{i},"row number {i}",{}]"#, i % 2 == 0));
    }
    body.push_str(r#"],"stats":{"state":"RUNNING","queued":false,"scheduled":true}}"#);
    body.into_bytes()
}

fn bench_whole_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_stream_whole_body");
    for rows in [1, 100, 1000] {
        let body = sample_reply(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &body, |b, body| {
            b.iter(|| {
                let mut stream = JsonStream::new();
                let events = stream.feed(body).expect("valid json");
                criterion::black_box(events);
            });
        });
    }
    group.finish();
}

fn bench_chunked_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_stream_chunked");
    let body = sample_reply(500);
    for chunk_size in [8usize, 64, 512] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &chunk_size| {
            b.iter(|| {
                let mut stream = JsonStream::new();
                for chunk in body.chunks(chunk_size) {
                    let events = stream.feed(chunk).expect("valid json");
                    criterion::black_box(events);
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_whole_body, bench_chunked_body);
criterion_main!(benches);
