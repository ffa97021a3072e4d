/*!
Error-free transformations.

An error-free transformation (EFT) evaluates a floating-point operation
and returns both the rounded result and the exact rounding error, so
that `sum + err == a ⊕ b` holds in exact arithmetic. The transforms in
this module are the primitives behind the multi-component cascades
([`cascade`][crate::cascade]) and adaptive expansions
([`ereal`][crate::ereal]).

Algorithmic constraint: the Knuth and Dekker sequences below are only
error-free when every intermediate rounds exactly once. rustc performs
no floating-point contraction, so adjacent multiplies and adds are
never fused into an FMA behind our back; the only FMA in this module
is the explicit [`f64::mul_add`] in [`two_product`]. Additionally,
every operand and error term must be a *normal* `f64`: once error
terms underflow to subnormals the non-overlapping invariant silently
breaks. This caps usable expansions at 19 limbs
(`2^(-53 * 19) >= 2^-1022`).

Reference: Shewchuk, "Adaptive Precision Floating-Point Arithmetic and
Fast Robust Geometric Predicates", 1997.
*/

/// Maximum number of limbs for which expansion arithmetic is
/// algorithmically valid (see the module documentation).
pub const MAX_LIMBS: usize = 19;

/// Knuth's two-sum: returns `(s, e)` with `s = fl(a + b)` and
/// `e = (a + b) - s` exactly, for any ordering of `|a|`, `|b|`.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    (s, e)
}

/// Dekker's fast two-sum: valid only when `|a| >= |b|` (or `a == 0`).
#[inline]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let e = b - (s - a);
    (s, e)
}

/// Two-difference: returns `(d, e)` with `d = fl(a - b)` and
/// `e = (a - b) - d` exactly.
#[inline]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let d = a - b;
    let bb = a - d;
    let e = (a - (d + bb)) + (bb - b);
    (d, e)
}

/// Veltkamp split at 27 bits: returns `(hi, lo)` with `a == hi + lo`
/// where both halves fit in 26 bits of significand.
#[inline]
pub fn veltkamp_split(a: f64) -> (f64, f64) {
    const SPLITTER: f64 = 134217729.0; // 2^27 + 1
    let t = SPLITTER * a;
    let hi = t - (t - a);
    let lo = a - hi;
    (hi, lo)
}

/// Two-product: returns `(p, e)` with `p = fl(a * b)` and
/// `e = a * b - p` exactly, computed with a fused multiply-add.
#[inline]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let e = a.mul_add(b, -p);
    (p, e)
}

/// Two-product via Dekker's splitting, for targets without a usable
/// FMA. Result is identical to [`two_product`] on normal inputs.
#[inline]
pub fn two_product_dekker(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let (ahi, alo) = veltkamp_split(a);
    let (bhi, blo) = veltkamp_split(b);
    let e = ((ahi * bhi - p) + ahi * blo + alo * bhi) + alo * blo;
    (p, e)
}

/// Multiplies an expansion by a scalar (Shewchuk's SCALE-EXPANSION),
/// threading each [`two_product`] error through a [`two_sum`] chain.
///
/// `e` is given and returned with limbs in decreasing magnitude order.
/// The result is a non-overlapping expansion equal to `e * b` exactly,
/// provided no component underflows.
pub fn scale_expansion(e: &[f64], b: f64) -> Vec<f64> {
    let asc: Vec<f64> = nonzero_ascending(e);
    if asc.is_empty() || b == 0.0 {
        return vec![0.0];
    }

    let mut h: Vec<f64> = Vec::with_capacity(2 * asc.len());
    let (mut q, h1) = two_product(asc[0], b);
    if h1 != 0.0 {
        h.push(h1);
    }

    for &ei in &asc[1..] {
        let (t, tt) = two_product(ei, b);
        let (q1, h_lo) = two_sum(q, tt);
        if h_lo != 0.0 {
            h.push(h_lo);
        }
        let (q2, h_hi) = fast_two_sum(t, q1);
        if h_hi != 0.0 {
            h.push(h_hi);
        }
        q = q2;
    }

    if q != 0.0 || h.is_empty() {
        h.push(q);
    }
    h.reverse();
    h
}

/// Sums two expansions (Shewchuk's LINEAR-EXPANSION-SUM): a
/// merge-sorted two-sum sweep producing a non-overlapping result.
///
/// Both inputs and the output store limbs in decreasing magnitude
/// order. NaN or infinity in any limb propagates to a single-limb
/// result by IEEE semantics.
pub fn linear_expansion_sum(e: &[f64], f: &[f64]) -> Vec<f64> {
    if let Some(nar) = non_real_limb(e).or_else(|| non_real_limb(f)) {
        return vec![nar];
    }

    // merge by increasing magnitude
    let mut g: Vec<f64> = nonzero_ascending(e);
    let gf = nonzero_ascending(f);
    g = merge_ascending(&g, &gf);

    match g.len() {
        0 => return vec![0.0],
        1 => return g,
        _ => {}
    }

    let mut h: Vec<f64> = Vec::with_capacity(g.len());
    let (mut q, mut qq) = fast_two_sum(g[1], g[0]);
    for &gi in &g[2..] {
        let (r, h_lo) = fast_two_sum(gi, qq);
        if h_lo != 0.0 {
            h.push(h_lo);
        }
        let (q1, qq1) = two_sum(q, r);
        q = q1;
        qq = qq1;
    }
    if qq != 0.0 {
        h.push(qq);
    }
    if q != 0.0 || h.is_empty() {
        h.push(q);
    }
    h.reverse();
    h
}

/// Multiplies two expansions: scales each limb of `a` by each limb of
/// `b`, sum-merges the partial expansions, and renormalizes.
pub fn expansion_product(a: &[f64], b: &[f64]) -> Vec<f64> {
    if let Some(nar) = non_real_limb(a).or_else(|| non_real_limb(b)) {
        return vec![nar];
    }

    let mut acc: Vec<f64> = vec![0.0];
    for &bj in b {
        if bj == 0.0 {
            continue;
        }
        let partial = scale_expansion(a, bj);
        acc = linear_expansion_sum(&acc, &partial);
    }
    renormalize(&acc)
}

/// Compresses a near-expansion back to the non-overlap invariant and
/// drops zero limbs. Limbs are expected (and returned) in decreasing
/// magnitude order. Renormalizing a renormalized expansion is the
/// identity.
pub fn renormalize(xs: &[f64]) -> Vec<f64> {
    if let Some(nar) = non_real_limb(xs) {
        return vec![nar];
    }

    let n = xs.len();
    if n == 0 {
        return vec![0.0];
    }
    if n == 1 {
        return vec![xs[0]];
    }

    // bottom-up sweep: absorb each limb into a running sum,
    // leaving the errors behind
    let mut t = vec![0.0; n];
    let mut s = xs[n - 1];
    for i in (0..n - 1).rev() {
        let (hi, lo) = fast_two_sum(xs[i], s);
        s = hi;
        t[i + 1] = lo;
    }
    t[0] = s;

    // top-down sweep: emit a component every time an error survives
    let mut out: Vec<f64> = Vec::with_capacity(n);
    let mut s = t[0];
    for &ti in &t[1..] {
        let (hi, lo) = fast_two_sum(s, ti);
        s = hi;
        if lo != 0.0 {
            out.push(s);
            s = lo;
        }
    }
    if s != 0.0 || out.is_empty() {
        out.push(s);
    }
    out
}

/// Checks the Priest non-overlap invariant
/// `|x[i+1]| <= ulp(x[i]) / 2` over adjacent limbs.
pub fn is_nonoverlapping(xs: &[f64]) -> bool {
    for w in xs.windows(2) {
        if w[0] == 0.0 {
            if w[1] != 0.0 {
                return false;
            }
            continue;
        }
        if w[1] != 0.0 && w[1].abs() > crate::native::ulp_f64(w[0]) / 2.0 {
            return false;
        }
    }
    true
}

// first NaN or infinite limb, if any
fn non_real_limb(xs: &[f64]) -> Option<f64> {
    xs.iter().copied().find(|x| !x.is_finite())
}

// strip zeros and flip a decreasing-magnitude expansion to ascending
fn nonzero_ascending(xs: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = xs.iter().copied().filter(|&x| x != 0.0).collect();
    v.reverse();
    v
}

// merge two magnitude-ascending slices into one
fn merge_ascending(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].abs() <= b[j].abs() {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
