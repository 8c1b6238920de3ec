use anyhow::{ensure, Result};
use trtis_client::{InferSpec, OutputSpec, TrtisClient};
use trtis_core::{decode_i32_slice, encode_u32, IOName};

/// Elements per input of the add/sub example model.
const INPUT_SIZE: usize = 16;

/// Sends `0..16` and sixteen ones to the add/sub model and checks that
/// OUTPUT0 holds the sums and OUTPUT1 the differences.
pub async fn run(client: &TrtisClient, model: String, model_version: Option<i64>) -> Result<()> {
    let input0: Vec<u32> = (0..INPUT_SIZE as u32).collect();
    let input1 = vec![1u32; INPUT_SIZE];

    let spec = InferSpec {
        model_name: model,
        model_version,
        batch_size: 1,
        inputs: vec![
            (IOName::from("INPUT0"), encode_u32(&input0)),
            (IOName::from("INPUT1"), encode_u32(&input1)),
        ],
        outputs: vec![OutputSpec::raw("OUTPUT0"), OutputSpec::raw("OUTPUT1")],
    };
    let outcome = client.infer(&spec).await?;

    let width = std::mem::size_of::<i32>();
    let sums = outcome.raw_outputs.check_slot(0, INPUT_SIZE, 1, width)?;
    let diffs = outcome.raw_outputs.check_slot(1, INPUT_SIZE, 1, width)?;
    let sums = decode_i32_slice(sums, 0, INPUT_SIZE)?;
    let diffs = decode_i32_slice(diffs, 0, INPUT_SIZE)?;

    println!("\nChecking Inference Outputs\n--------------------------");
    for i in 0..INPUT_SIZE {
        let (a, b) = (input0[i] as i32, input1[i] as i32);
        println!("{a} + {b} = {}", sums[i]);
        println!("{a} - {b} = {}", diffs[i]);
        ensure!(sums[i] == a + b, "incorrect sum at {i}: {} != {}", sums[i], a + b);
        ensure!(diffs[i] == a - b, "incorrect difference at {i}: {} != {}", diffs[i], a - b);
    }
    Ok(())
}
