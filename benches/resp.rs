use criterion::{black_box, criterion_group, criterion_main, Criterion};
use check_redis_sentinel::*;
use std::io::Cursor;

fn bench_reply_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("resp");

    group.bench_function("decode_info_bulk", |b| {
        let mut body = String::from("# Replication\r\nrole:master\r\n");
        for i in 0..200 {
            body.push_str(&format!("field_{}:value_{}\r\n", i, i));
        }
        let frame = format!("${}\r\n{}\r\n", body.len(), body).into_bytes();
        b.iter(|| {
            let reply = read_reply(&mut Cursor::new(&frame[..])).unwrap();
            if let Reply::Bulk(Some(payload)) = reply {
                black_box(parse_info(&payload).len());
            }
        });
    });

    group.bench_function("decode_nested_array_1k", |b| {
        let mut frame = String::from("*1000\r\n");
        for i in 0..1000 {
            frame.push_str(&format!("*2\r\n$9\r\n10.0.0.{:<2}\r\n:{}\r\n", i % 100, 6379 + i));
        }
        let frame = frame.into_bytes();
        b.iter(|| black_box(read_reply(&mut Cursor::new(&frame[..])).unwrap()));
    });

    group.bench_function("encode_command", |b| {
        b.iter(|| black_box(encode_command("SENTINEL", &["GET-MASTER-ADDR-BY-NAME", "mymaster"])));
    });

    group.finish();
}

criterion_group!(benches, bench_reply_decode);
criterion_main!(benches);
