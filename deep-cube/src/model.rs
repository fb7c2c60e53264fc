use std::path::Path;

use cube::{Cube, ACTION_COUNT, ONE_HOT_SIZE};
use tch::{
    nn::{Init, VarStore},
    Device,
    Kind,
    TchError,
    Tensor,
};

use crate::{
    error::OracleError,
    oracle::{Eval, Oracle, Policy},
    DEVICE,
};

const HIDDEN: [i64; 2] = [4096, 2048];

impl From<TchError> for OracleError {
    fn from(e: TchError) -> Self {
        let msg = e.to_string();
        if msg.to_lowercase().contains("out of memory") {
            OracleError::Capacity(msg)
        } else {
            OracleError::Fatal(msg)
        }
    }
}

/// Weights and bias of one fully connected layer.
#[derive(Debug)]
struct Dense {
    ws: Tensor,
    bs: Tensor,
}

impl Dense {
    fn new(path: &tch::nn::Path, name: &str, inputs: i64, outputs: i64) -> Self {
        let path = path / name;
        Dense {
            ws: path.var("weight", &[outputs, inputs], Init::KaimingUniform),
            bs: path.zeros("bias", &[outputs]),
        }
    }

    fn forward(&self, input: &Tensor) -> Result<Tensor, TchError> {
        input.f_matmul(&self.ws.tr())?.f_add(&self.bs)
    }
}

/// Fully connected policy and value network over the one-hot cube encoding.
#[derive(Debug)]
pub struct Net {
    vs: VarStore,
    hidden: Vec<Dense>,
    policy: Dense,
    value: Dense,
}

impl Default for Net {
    fn default() -> Self {
        let vs = VarStore::new(*DEVICE);
        let root = vs.root();

        let mut inputs = ONE_HOT_SIZE as i64;
        let mut hidden = Vec::with_capacity(HIDDEN.len());
        for (i, &outputs) in HIDDEN.iter().enumerate() {
            hidden.push(Dense::new(&root, &format!("hidden{i}"), inputs, outputs));
            inputs = outputs;
        }
        let policy = Dense::new(&root, "policy", inputs, ACTION_COUNT as i64);
        let value = Dense::new(&root, "value", inputs, 1);

        Net {
            vs,
            hidden,
            policy,
            value,
        }
    }
}

impl Net {
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<(), TchError> {
        self.vs.save(path)
    }

    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self, TchError> {
        let mut net = Self::default();
        net.vs.load(path)?;
        Ok(net)
    }

    /// Softmax policy and raw value for a batch of encoded states.
    fn forward(&self, input: &Tensor) -> Result<(Tensor, Tensor), TchError> {
        let mut s = input.shallow_clone();
        for layer in &self.hidden {
            s = layer.forward(&s)?.f_relu()?;
        }
        let policy = self.policy.forward(&s)?.f_softmax(1, Kind::Float)?;
        let value = self.value.forward(&s)?;
        Ok((policy, value))
    }
}

/// Stack the one-hot encodings of `states` into a `[states, ONE_HOT_SIZE]` tensor.
fn encode(states: &[Cube]) -> Result<Tensor, TchError> {
    let mut data = vec![0f32; states.len() * ONE_HOT_SIZE];
    for (state, chunk) in states.iter().zip(data.chunks_exact_mut(ONE_HOT_SIZE)) {
        state.write_one_hot(chunk);
    }
    Tensor::of_slice(&data)
        .f_view(&[states.len() as i64, ONE_HOT_SIZE as i64][..])?
        .f_to_device(*DEVICE)
}

fn to_vec(tensor: &Tensor, len: usize) -> Result<Vec<f32>, TchError> {
    let tensor = tensor.f_to_device(Device::Cpu)?.f_contiguous()?;
    let mut data = vec![0f32; len];
    tensor.f_copy_data(&mut data, len)?;
    Ok(data)
}

impl Oracle for Net {
    fn evaluate(&self, states: &[Cube]) -> Result<Vec<(Policy, Eval)>, OracleError> {
        if states.is_empty() {
            return Ok(Vec::new());
        }
        let (policy, value) = tch::no_grad(|| self.forward(&encode(states)?))?;
        let policies = to_vec(&policy, states.len() * ACTION_COUNT)?;
        let values = to_vec(&value, states.len())?;

        Ok(policies
            .chunks_exact(ACTION_COUNT)
            .zip(values)
            .map(|(chunk, value)| {
                let mut policy = [0.; ACTION_COUNT];
                policy.copy_from_slice(chunk);
                (policy, value)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use cube::{scramble, Cube};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn random_net_outputs_distributions() {
        let net = Net::default();
        let mut rng = StdRng::seed_from_u64(0);
        let states: Vec<Cube> = (0..5).map(|_| scramble(7, &mut rng).0).collect();
        let outputs = net.evaluate(&states).unwrap();
        assert_eq!(outputs.len(), 5);
        for (policy, value) in outputs {
            assert!((policy.iter().sum::<f32>() - 1.).abs() < 1e-4);
            assert!(value.is_finite());
        }
    }

    #[test]
    fn memory_errors_are_retryable() {
        let oom = TchError::Torch("CUDA out of memory. Tried to allocate 2.00 GiB".to_string());
        assert!(matches!(OracleError::from(oom), OracleError::Capacity(_)));
        let shape = TchError::Shape("mismatch".to_string());
        assert!(matches!(OracleError::from(shape), OracleError::Fatal(_)));
    }
}
