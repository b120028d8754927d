// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use s3object::s3::file_reader::ChunkedFileReader;
use s3object::s3::utils::{digest, is_multipart_etag, md5sum_hash, md5_hex_to_b64};
use std::io::Write;
use tokio::runtime::Runtime;

fn bench_checksums(c: &mut Criterion) {
    let sizes = vec![
        ("1KB", 1024),
        ("100KB", 100 * 1024),
        ("1MB", 1024 * 1024),
        ("10MB", 10 * 1024 * 1024),
    ];

    for (name, size) in sizes {
        let data = vec![0u8; size];

        let mut group = c.benchmark_group(format!("checksum_{name}"));
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function("MD5", |b| b.iter(|| md5sum_hash(&data)));

        group.bench_function("MD5+Base64", |b| b.iter(|| digest(&data)));

        group.finish();
    }
}

fn bench_etags(c: &mut Criterion) {
    let plain = digest(b"etag").0;
    let multipart = format!("\"{plain}-17\"");

    let mut group = c.benchmark_group("etag");
    group.bench_function("is_multipart_plain", |b| b.iter(|| is_multipart_etag(&plain)));
    group.bench_function("is_multipart_composite", |b| {
        b.iter(|| is_multipart_etag(&multipart))
    });
    group.bench_function("hex_to_b64", |b| b.iter(|| md5_hex_to_b64(&plain)));
    group.finish();
}

fn bench_file_reader(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let size = 8 * 1024 * 1024;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&vec![7u8; size]).unwrap();
    file.flush().unwrap();

    let mut group = c.benchmark_group("chunked_file_reader_8MB");
    group.throughput(Throughput::Bytes(size as u64));
    for block_size in [4096, 64 * 1024, 1024 * 1024] {
        group.bench_function(format!("block_{block_size}"), |b| {
            b.iter(|| {
                rt.block_on(async {
                    let mut reader = ChunkedFileReader::with_block_size(file.path(), block_size);
                    let mut total = 0;
                    loop {
                        let chunk = reader.next_chunk().await.unwrap();
                        if chunk.is_empty() {
                            break;
                        }
                        total += chunk.len();
                    }
                    assert_eq!(total, size);
                })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_checksums, bench_etags, bench_file_reader);
criterion_main!(benches);
