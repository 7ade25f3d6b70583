//! Sparse Round Trip: dense → COO / CSR → dense
//!
//! This example converts a mostly-zero activation map and a pruned weight
//! matrix into sparse form, inspects them, and rebuilds the dense tensors.
//!
//! Key concepts demonstrated:
//! - `to_coo(Some(k))` keeps the trailing axes dense (hybrid COO)
//! - `to_csr()` packs a 2-D tensor into one buffer
//! - `get_value` distinguishes stored values from implicit zeros
//! - A custom `Allocator` sees exactly one request per conversion
//!
//! Run with:
//! ```sh
//! cargo run --example sparse_roundtrip
//! ```

use sparsekit::prelude::*;
use sparsekit::tensor::Storage;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Allocator that reports every request before serving it from the heap
#[derive(Default)]
struct Verbose {
    inner: HostAllocator,
    calls: AtomicUsize,
}

impl Allocator for Verbose {
    fn allocate(&self, size_bytes: usize) -> Result<Storage> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        println!("  [alloc #{n}] {size_bytes} bytes");
        self.inner.allocate(size_bytes)
    }

    fn allocated_bytes(&self) -> usize {
        self.inner.allocated_bytes()
    }

    fn allocation_count(&self) -> usize {
        self.inner.allocation_count()
    }
}

fn main() -> Result<()> {
    let alloc = Verbose::default();

    // -----------------------------------------------------------------------
    // 1. Activation map (C=4, H=2, W=2): only two channels fire
    // -----------------------------------------------------------------------
    #[rustfmt::skip]
    let activations = Tensor::from_slice(
        &[
            0.0f32, 0.0, 0.0, 0.0,
            0.5,    0.0, 0.0, 1.25,
            0.0,    0.0, 0.0, 0.0,
            0.0,    3.0, 0.0, 0.0,
        ],
        &[4, 2, 2],
    )?;

    println!("Hybrid COO, one slice per channel:");
    let coo = CooTensor::with_allocator(&activations, 1, &alloc)?;
    print!("{coo}");
    println!(
        "  nnz={} density={:.3} memory={} bytes",
        coo.nnz(),
        coo.density(),
        coo.memory_usage()
    );
    println!("  value at (1, 1, 1): {:?}", coo.get_value_as::<f32>(&[1, 1, 1])?);
    println!("  channel 2 stored:   {:?}", coo.get_value(&[2])?.is_some());

    let restored = coo.to_dense()?;
    assert_eq!(restored.to_vec::<f32>()?, activations.to_vec::<f32>()?);

    // -----------------------------------------------------------------------
    // 2. Pruned int8 weights, quantized
    // -----------------------------------------------------------------------
    let weights = Tensor::from_quantized_slice(
        &[0i8, 12, 0, 0, 0, 0, -7, 0, 0, 0, 0, 33],
        &[3, 4],
        DType::QSymm8,
        QuantizationInfo::uniform(0.02, 0),
    )?;

    println!("\nCSR of quantized weights:");
    let csr = CsrTensor::with_allocator(&weights, &alloc)?;
    print!("{csr}");
    for i in 0..csr.nnz() {
        let coords = csr.get_coordinates(i)?;
        println!(
            "  entry {i}: {:?} = {:?}",
            coords.as_slice(),
            csr.get_value_as::<i8>(&coords)?
        );
    }
    println!("  (1, 0) is an implicit zero: {}", csr.get_value(&[1, 0])?.is_none());

    let restored = csr.to_dense()?;
    assert_eq!(restored.to_vec::<i8>()?, weights.to_vec::<i8>()?);
    assert_eq!(restored.info().quantization(), weights.info().quantization());

    // -----------------------------------------------------------------------
    // 3. Rejected input: channels-last tensors are not converted
    // -----------------------------------------------------------------------
    let nhwc = activations.with_data_layout(DataLayout::Nhwc);
    match CooTensor::with_allocator(&nhwc, 1, &alloc) {
        Err(e) => println!("\nNHWC source rejected: {e}"),
        Ok(_) => unreachable!("NHWC sources are rejected"),
    }

    println!(
        "\n{} allocations, {} bytes total",
        alloc.allocation_count(),
        alloc.allocated_bytes()
    );
    Ok(())
}
