//! Example that demonstrates the exact usage shown in the README.md file.
//!
//! This shows how to use `AllocVec` with the default allocator and how positions work.

use alloc_vec::AllocVec;

fn main() {
    println!("=== AllocVec README Example ===");

    // Create a container and fill it. Growth is fallible, so every push returns a Result.
    let mut items = AllocVec::new();
    for i in 1..=5 {
        items.push(i * 10).unwrap();
    }

    println!("Items: {items:?} (capacity {})", items.capacity());

    // Positions identify items by index and survive reallocation.
    let inserted = items.insert(items.begin() + 2, 25).unwrap();
    println!("Inserted 25 at index {}", inserted.index());

    let next = items.erase(items.begin());
    println!("Erased the first item, the next one is now at index {}", next.index());

    // Remove every item divisible by 20.
    let removed = alloc_vec::erase_if(&mut items, |item| item % 20 == 0);
    println!("Removed {removed} items divisible by 20");

    assert_eq!(items, [25, 30, 50]);

    // Checked access reports out-of-bounds indexes as errors instead of panicking.
    match items.at(10) {
        Ok(item) => println!("Unexpected item: {item}"),
        Err(error) => println!("Checked access failed as expected: {error}"),
    }

    println!("README example completed successfully!");
}
